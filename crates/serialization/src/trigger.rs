use std::any::TypeId;
use std::sync::Arc;

use synapse_archive::{ArchiveFormat, Persist};

use crate::base::Base;
use crate::builder::RegistryBuilder;
use crate::construct::construct;
use crate::error::RegistryError;

/// Registers `T` under `name`: loader, type tag, then saver.
///
/// `upcast` turns the freshly constructed value into the base handle; callers
/// that know the concrete base write it as `|value| value`.
///
/// Registering the type that already owns `name`, and whose type tag still
/// points at `name`, is a no-op. Under
/// [`DuplicatePolicy::Reject`](crate::DuplicatePolicy::Reject) every slot is
/// checked first, so a rejected call leaves the builder unchanged.
pub fn register_serializer<F, B, T>(
	builder: &mut RegistryBuilder<F, B>,
	name: &str,
	upcast: fn(Arc<T>) -> Arc<B>,
) -> Result<(), RegistryError>
where
	F: ArchiveFormat,
	B: ?Sized + Base,
	T: Persist + Send + Sync + 'static,
{
	if builder.owner_of(name) == Some(TypeId::of::<T>()) && builder.name_for::<T>() == Some(name) {
		tracing::debug!(format = F::NAME, name, "serializer already registered");
		return Ok(());
	}
	builder.ensure_vacant::<T>(name)?;

	let loader_name: Arc<str> = Arc::from(name);
	builder.register_loader(name, move |ar: &mut F::Input| {
		construct::<_, T>(&loader_name, ar).map(upcast)
	})?;
	builder.register_type::<T>(name)?;
	builder.register_saver::<T, _>(name, |ar: &mut F::Output, value: &T| {
		value.save(ar).map_err(RegistryError::from)
	})?;

	tracing::debug!(
		format = F::NAME,
		name,
		concrete = std::any::type_name::<T>(),
		"registered serializer"
	);
	Ok(())
}
