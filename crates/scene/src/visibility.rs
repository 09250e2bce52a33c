use serde::{Deserialize, Serialize};

/// Toggleable map overlays.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    /// Central line, limits and the shaded totality band.
    Path,
    Cities,
    PointsOfInterest,
    Weather,
}

impl Layer {
    pub const ALL: [Layer; 4] = [Layer::Path, Layer::Cities, Layer::PointsOfInterest, Layer::Weather];
}

impl std::str::FromStr for Layer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "path" => Ok(Layer::Path),
            "cities" => Ok(Layer::Cities),
            "pois" | "points_of_interest" => Ok(Layer::PointsOfInterest),
            "weather" => Ok(Layer::Weather),
            other => Err(format!("unknown layer {other:?}")),
        }
    }
}

/// Which overlays are drawn. Weather zones start hidden.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerVisibility {
    pub path: bool,
    pub cities: bool,
    pub points_of_interest: bool,
    pub weather: bool,
}

impl Default for LayerVisibility {
    fn default() -> Self {
        Self {
            path: true,
            cities: true,
            points_of_interest: true,
            weather: false,
        }
    }
}

impl LayerVisibility {
    pub fn is_visible(&self, layer: Layer) -> bool {
        match layer {
            Layer::Path => self.path,
            Layer::Cities => self.cities,
            Layer::PointsOfInterest => self.points_of_interest,
            Layer::Weather => self.weather,
        }
    }

    /// Returns `true` if the flag changed.
    pub fn set(&mut self, layer: Layer, visible: bool) -> bool {
        let slot = match layer {
            Layer::Path => &mut self.path,
            Layer::Cities => &mut self.cities,
            Layer::PointsOfInterest => &mut self.points_of_interest,
            Layer::Weather => &mut self.weather,
        };
        let changed = *slot != visible;
        *slot = visible;
        changed
    }
}
