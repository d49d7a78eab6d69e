use std::sync::Arc;

use synapse_archive::{InputArchive, Persist};

use crate::error::RegistryError;

/// Builds a `T` from the archive and moves it into shared ownership.
///
/// The value is assembled in a local first; shared storage is only created
/// once `load_and_construct` returned a complete value. When the archive fails
/// part way, no `T` exists, so `T`'s destructor never runs, and whatever
/// fields were already decoded are dropped once as ordinary locals.
pub fn construct<A, T>(name: &str, ar: &mut A) -> Result<Arc<T>, RegistryError>
where
	A: InputArchive,
	T: Persist,
{
	match T::load_and_construct(ar) {
		Ok(value) => Ok(Arc::new(value)),
		Err(source) => {
			tracing::debug!(name, error = %source, "construction from archive failed");
			Err(RegistryError::Construction {
				name: name.to_owned(),
				source,
			})
		}
	}
}
