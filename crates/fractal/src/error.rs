use crate::view::Power;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("power {0} is out of range; expected {min}..={max}", min = Power::MIN, max = Power::MAX)]
    PowerOutOfRange(u8),
}
