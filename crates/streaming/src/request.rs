/// Identifies an auxiliary request in a deterministic, stable way.
///
/// Ids increase monotonically per dispatcher, so a consumer can drop any
/// update whose id is older than the one it is waiting for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct Request(pub u64);

impl Request {
    pub fn next(self) -> Request {
        Request(self.0 + 1)
    }
}
