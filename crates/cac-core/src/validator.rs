//! Validation hook run before a push

use cac_patch::{Extensions, Patch};

use crate::error::Result;

/// Checks a patch before it leaves the local storage. Schema validation
/// against the remote service's model plugs in here.
pub trait Validator<E: Extensions> {
    fn validate(&self, patch: &Patch<E>) -> Result<()>;
}

impl<E, F> Validator<E> for F
where
    E: Extensions,
    F: Fn(&Patch<E>) -> Result<()>,
{
    fn validate(&self, patch: &Patch<E>) -> Result<()> {
        self(patch)
    }
}
