use std::ops::{Deref, DerefMut};

/// A flat, ordered collection of members. [crate::genome::Species] holds its
/// genomes in one of these; it exists mainly so species-level operations
/// (sort by fitness, truncate to a quota) read as domain operations rather
/// than raw `Vec` calls scattered through [crate::genome::Species].
#[derive(Debug, Clone, Default)]
pub struct Cohort<T>(Vec<T>);

impl<T> Cohort<T> {
    pub fn new(members: Vec<T>) -> Self {
        Cohort(members)
    }

    pub fn empty() -> Self {
        Cohort(Vec::new())
    }

    pub fn into_inner(self) -> Vec<T> {
        self.0
    }
}

impl<T> Deref for Cohort<T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for Cohort<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> FromIterator<T> for Cohort<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Cohort(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for Cohort<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
