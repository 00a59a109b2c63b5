/// Implemented by anything that can be in an invalid state by construction
/// (an empty gene list, a malformed structural reference) and needs to be
/// checked rather than trusted.
pub trait Valid {
    fn is_valid(&self) -> bool;
}
