use std::any::Any;
use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;
use serde_json::json;
use synapse_archive::{
	ArchiveError, Binary, BinaryInputArchive, BinaryOutputArchive, InputArchive, Json,
	JsonInputArchive, JsonOutputArchive, OutputArchive, Persist,
};

use super::*;
use crate::envelope::{load_record, save_record};
use crate::{DuplicatePolicy, GlobalRegistry, InsertAction, RegistryBuilder, TableKind, register_serializer};

trait Shape: Any + Send + Sync + Debug {
	fn area(&self) -> f64;

	fn concrete_name(&self) -> &'static str {
		std::any::type_name::<Self>()
	}
}

impl Base for dyn Shape {
	fn as_any(&self) -> &dyn Any {
		self
	}

	fn type_name(&self) -> &'static str {
		self.concrete_name()
	}
}

fn upcast<T: Shape>(value: Arc<T>) -> Arc<dyn Shape> {
	value
}

#[derive(Debug, PartialEq)]
struct Circle {
	radius: f64,
}

impl Shape for Circle {
	fn area(&self) -> f64 {
		std::f64::consts::PI * self.radius * self.radius
	}
}

impl Persist for Circle {
	fn save<A: OutputArchive>(&self, ar: &mut A) -> Result<(), ArchiveError> {
		ar.write("radius", &self.radius)
	}

	fn load_and_construct<A: InputArchive>(ar: &mut A) -> Result<Self, ArchiveError> {
		Ok(Self {
			radius: ar.read("radius")?,
		})
	}
}

#[derive(Debug, PartialEq)]
struct Rect {
	width: f64,
	height: f64,
}

impl Shape for Rect {
	fn area(&self) -> f64 {
		self.width * self.height
	}
}

impl Persist for Rect {
	fn save<A: OutputArchive>(&self, ar: &mut A) -> Result<(), ArchiveError> {
		ar.write("width", &self.width)?;
		ar.write("height", &self.height)
	}

	fn load_and_construct<A: InputArchive>(ar: &mut A) -> Result<Self, ArchiveError> {
		let width = ar.read("width")?;
		let height = ar.read("height")?;
		Ok(Self { width, height })
	}
}

fn shapes<F: ArchiveFormat>(policy: DuplicatePolicy) -> RegistryBuilder<F, dyn Shape> {
	let mut builder = RegistryBuilder::with_config(RegistryConfig::default().with_duplicates(policy));
	register_serializer::<F, dyn Shape, Circle>(&mut builder, "circle", upcast).unwrap();
	register_serializer::<F, dyn Shape, Rect>(&mut builder, "rect", upcast).unwrap();
	builder
}

fn downcast<T: 'static>(shape: &Arc<dyn Shape>) -> &T {
	shape.as_any().downcast_ref::<T>().unwrap()
}

#[test]
fn test_json_round_trip() {
	let registry = shapes::<Json>(DuplicatePolicy::LastWins).finalize();
	let rect: Arc<dyn Shape> = Arc::new(Rect {
		width: 2.0,
		height: 3.5,
	});

	let mut out = JsonOutputArchive::new();
	save_record(&registry, &mut out, rect.as_ref()).unwrap();
	let value = out.into_value().unwrap();
	assert_eq!(value, json!([{ "type": "rect", "width": 2.0, "height": 3.5 }]));

	let mut input = JsonInputArchive::from_value(value).unwrap();
	let loaded = load_record(&registry, &mut input).unwrap();
	assert_eq!(
		downcast::<Rect>(&loaded),
		&Rect {
			width: 2.0,
			height: 3.5
		}
	);
	assert_eq!(loaded.area(), 7.0);
}

#[test]
fn test_binary_round_trip() {
	let registry = shapes::<Binary>(DuplicatePolicy::LastWins).finalize();
	let circle: Arc<dyn Shape> = Arc::new(Circle { radius: 1.5 });

	let mut out = BinaryOutputArchive::new();
	save_record(&registry, &mut out, circle.as_ref()).unwrap();
	save_record(&registry, &mut out, circle.as_ref()).unwrap();

	let mut input = BinaryInputArchive::new(out.into_bytes());
	for _ in 0..2 {
		let loaded = load_record(&registry, &mut input).unwrap();
		assert_eq!(downcast::<Circle>(&loaded), &Circle { radius: 1.5 });
	}
	assert!(input.is_exhausted());
}

#[test]
fn test_serialization_name_tracks_last_register_type() {
	let mut builder = shapes::<Json>(DuplicatePolicy::LastWins);
	builder.register_type::<Circle>("disc").unwrap();
	let registry = builder.finalize();

	assert_eq!(registry.serialization_name(TypeId::of::<Circle>()).unwrap(), "disc");
	assert_eq!(registry.serialization_name_of::<Rect>().unwrap(), "rect");
	assert_eq!(registry.names(), vec!["circle", "rect"]);
}

#[test]
fn test_unregistered_identity() {
	let registry = shapes::<Json>(DuplicatePolicy::LastWins).finalize();
	let err = registry.serialization_name_of::<String>().unwrap_err();
	assert!(matches!(
		err,
		RegistryError::UnregisteredTypeIdentity { type_name } if type_name.ends_with("String")
	));
	assert!(matches!(
		registry.serialization_name(TypeId::of::<u8>()).unwrap_err(),
		RegistryError::UnregisteredTypeIdentity { .. }
	));
}

#[test]
fn test_unregistered_name_on_load_and_save() {
	let registry = shapes::<Json>(DuplicatePolicy::LastWins).finalize();

	let mut input = JsonInputArchive::parse(r#"[{"side": 1.0}]"#).unwrap();
	input.start_node().unwrap();
	let err = registry.load("square", &mut input).unwrap_err();
	assert!(matches!(
		&err,
		RegistryError::UnregisteredTypeName { name, format: "json" } if name == "square"
	));
	assert!(err.to_string().contains("register the type"));

	let mut out = JsonOutputArchive::new();
	out.start_node().unwrap();
	let circle = Circle { radius: 1.0 };
	let err = registry.save("square", &mut out, &circle as &dyn Shape).unwrap_err();
	assert!(matches!(err, RegistryError::UnregisteredTypeName { .. }));
}

#[test]
fn test_save_record_of_unregistered_type() {
	#[derive(Debug)]
	struct Triangle;

	impl Shape for Triangle {
		fn area(&self) -> f64 {
			0.0
		}
	}

	let registry = shapes::<Json>(DuplicatePolicy::LastWins).finalize();
	let mut out = JsonOutputArchive::new();
	let err = save_record(&registry, &mut out, &Triangle as &dyn Shape).unwrap_err();
	assert!(matches!(err, RegistryError::UnregisteredTypeIdentity { .. }));
	assert!(out.records().is_empty());
	assert_eq!(out.depth(), 0);
}

#[test]
fn test_downcast_mismatch_is_explicit() {
	let registry = shapes::<Binary>(DuplicatePolicy::LastWins).finalize();
	let rect = Rect {
		width: 1.0,
		height: 1.0,
	};

	let mut out = BinaryOutputArchive::new();
	let err = registry.save("circle", &mut out, &rect as &dyn Shape).unwrap_err();
	match err {
		RegistryError::DowncastMismatch {
			name,
			expected,
			found,
		} => {
			assert_eq!(name, "circle");
			assert!(expected.ends_with("Circle"));
			assert!(found.ends_with("Rect"));
		}
		other => panic!("expected downcast mismatch, got {other:?}"),
	}
	assert!(out.is_empty());
}

static POLYGON_DROPS: AtomicUsize = AtomicUsize::new(0);
static LABEL_DROPS: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug)]
struct Label(String);

impl Drop for Label {
	fn drop(&mut self) {
		LABEL_DROPS.fetch_add(1, Ordering::SeqCst);
	}
}

#[derive(Debug)]
struct Polygon {
	label: Label,
	sides: u32,
}

impl Drop for Polygon {
	fn drop(&mut self) {
		POLYGON_DROPS.fetch_add(1, Ordering::SeqCst);
	}
}

impl Shape for Polygon {
	fn area(&self) -> f64 {
		f64::from(self.sides)
	}
}

impl Persist for Polygon {
	fn save<A: OutputArchive>(&self, ar: &mut A) -> Result<(), ArchiveError> {
		ar.write("label", &self.label.0)?;
		ar.write("sides", &self.sides)
	}

	fn load_and_construct<A: InputArchive>(ar: &mut A) -> Result<Self, ArchiveError> {
		let label = Label(ar.read("label")?);
		let sides = ar.read("sides")?;
		Ok(Self { label, sides })
	}
}

#[test]
fn test_failed_construction_never_drops_the_value() {
	let mut builder = RegistryBuilder::<Json, dyn Shape>::new();
	register_serializer::<Json, dyn Shape, Polygon>(&mut builder, "polygon", upcast).unwrap();
	let registry = builder.finalize();

	let mut input = JsonInputArchive::parse(r#"[{"type": "polygon", "label": "half"}]"#).unwrap();
	let err = load_record(&registry, &mut input).unwrap_err();
	match err {
		RegistryError::Construction { name, source } => {
			assert_eq!(name, "polygon");
			assert!(matches!(source, ArchiveError::MissingField { label } if label == "sides"));
		}
		other => panic!("expected construction failure, got {other:?}"),
	}
	assert_eq!(POLYGON_DROPS.load(Ordering::SeqCst), 0);
	assert_eq!(LABEL_DROPS.load(Ordering::SeqCst), 1);

	let mut input =
		JsonInputArchive::parse(r#"[{"type": "polygon", "label": "full", "sides": 5}]"#).unwrap();
	let loaded = load_record(&registry, &mut input).unwrap();
	assert_eq!(loaded.area(), 5.0);
	drop(loaded);
	assert_eq!(POLYGON_DROPS.load(Ordering::SeqCst), 1);
	assert_eq!(LABEL_DROPS.load(Ordering::SeqCst), 2);
}

#[test]
fn test_duplicate_name_last_wins() {
	let mut builder = shapes::<Json>(DuplicatePolicy::LastWins);
	register_serializer::<Json, dyn Shape, Rect>(&mut builder, "circle", upcast).unwrap();
	let registry = builder.finalize();

	let mut input =
		JsonInputArchive::parse(r#"[{"type": "circle", "width": 1.0, "height": 4.0}]"#).unwrap();
	let loaded = load_record(&registry, &mut input).unwrap();
	assert!(loaded.as_any().is::<Rect>());

	// Circle lost its loader and saver; only its stale type tag remains.
	let circle = Circle { radius: 1.0 };
	let mut out = JsonOutputArchive::new();
	let err = save_record(&registry, &mut out, &circle as &dyn Shape).unwrap_err();
	assert!(matches!(err, RegistryError::DowncastMismatch { .. }));
	assert_eq!(out.depth(), 0);
	assert!(out.records().is_empty());

	let tables: Vec<_> = registry.collisions().iter().map(|c| c.table).collect();
	assert_eq!(
		tables,
		vec![TableKind::Loader, TableKind::TypeTag, TableKind::Saver]
	);
	assert!(
		registry
			.collisions()
			.iter()
			.all(|c| c.action == InsertAction::ReplacedExisting)
	);
}

#[test]
fn test_duplicate_name_first_wins() {
	let mut builder = shapes::<Json>(DuplicatePolicy::FirstWins);
	register_serializer::<Json, dyn Shape, Rect>(&mut builder, "circle", upcast).unwrap();
	assert_eq!(builder.owner_of("circle"), Some(TypeId::of::<Circle>()));
	let registry = builder.finalize();

	let mut input = JsonInputArchive::parse(r#"[{"type": "circle", "radius": 2.0}]"#).unwrap();
	let loaded = load_record(&registry, &mut input).unwrap();
	assert_eq!(downcast::<Circle>(&loaded), &Circle { radius: 2.0 });
}

#[test]
fn test_duplicate_name_rejected() {
	let mut builder = shapes::<Json>(DuplicatePolicy::Reject);
	let err = register_serializer::<Json, dyn Shape, Rect>(&mut builder, "circle", upcast).unwrap_err();
	assert!(matches!(
		err,
		RegistryError::DuplicateName { table: TableKind::Loader, name } if name == "circle"
	));
	assert!(builder.collisions().is_empty());
}

#[test]
fn test_rejected_registration_leaves_no_partial_entry() {
	let mut builder = shapes::<Json>(DuplicatePolicy::Reject);
	let err = register_serializer::<Json, dyn Shape, Circle>(&mut builder, "disc", upcast).unwrap_err();
	assert!(matches!(
		err,
		RegistryError::DuplicateName { table: TableKind::TypeTag, .. }
	));
	assert_eq!(builder.owner_of("disc"), None);

	let registry = builder.finalize();
	assert!(!registry.contains("disc"));
	assert_eq!(registry.names(), vec!["circle", "rect"]);
	assert_eq!(registry.serialization_name_of::<Circle>().unwrap(), "circle");

	let circle = Circle { radius: 1.0 };
	let mut out = JsonOutputArchive::new();
	out.start_node().unwrap();
	assert!(matches!(
		registry.save("disc", &mut out, &circle as &dyn Shape).unwrap_err(),
		RegistryError::UnregisteredTypeName { .. }
	));
}

#[test]
fn test_reregistering_under_earlier_name_restores_type_tag() {
	let mut builder = RegistryBuilder::<Json, dyn Shape>::new();
	register_serializer::<Json, dyn Shape, Circle>(&mut builder, "circle", upcast).unwrap();
	register_serializer::<Json, dyn Shape, Circle>(&mut builder, "disc", upcast).unwrap();
	register_serializer::<Json, dyn Shape, Circle>(&mut builder, "circle", upcast).unwrap();
	assert_eq!(builder.name_for::<Circle>(), Some("circle"));
	let registry = builder.finalize();

	assert_eq!(registry.serialization_name_of::<Circle>().unwrap(), "circle");

	let mut out = JsonOutputArchive::new();
	save_record(&registry, &mut out, &Circle { radius: 2.0 } as &dyn Shape).unwrap();
	assert_eq!(
		out.into_value().unwrap(),
		json!([{ "type": "circle", "radius": 2.0 }])
	);
}

#[test]
fn test_reregistering_same_type_is_idempotent() {
	let mut builder = shapes::<Binary>(DuplicatePolicy::Reject);
	register_serializer::<Binary, dyn Shape, Circle>(&mut builder, "circle", upcast).unwrap();
	let registry = builder.finalize();
	assert!(registry.collisions().is_empty());
	assert_eq!(registry.len(), 2);
}

#[test]
fn test_manual_registration_without_trigger() {
	let mut builder = RegistryBuilder::<Json, dyn Shape>::new();
	builder
		.register_loader("unit_circle", |_ar: &mut JsonInputArchive| {
			Ok(Arc::new(Circle { radius: 1.0 }) as Arc<dyn Shape>)
		})
		.unwrap();
	builder.register_type::<Circle>("unit_circle").unwrap();
	builder
		.register_saver::<Circle, _>("unit_circle", |_ar: &mut JsonOutputArchive, _c: &Circle| Ok(()))
		.unwrap();
	let registry = builder.finalize();

	let mut out = JsonOutputArchive::new();
	save_record(&registry, &mut out, &Circle { radius: 9.0 } as &dyn Shape).unwrap();
	let mut input = JsonInputArchive::from_value(out.into_value().unwrap()).unwrap();
	let loaded = load_record(&registry, &mut input).unwrap();
	assert_eq!(downcast::<Circle>(&loaded), &Circle { radius: 1.0 });
}

fn bootstrap_shapes(builder: &mut RegistryBuilder<Json, dyn Shape>) -> Result<(), RegistryError> {
	register_serializer::<Json, dyn Shape, Circle>(builder, "circle", upcast)
}

static SHAPES: GlobalRegistry<Json, dyn Shape> = GlobalRegistry::new(bootstrap_shapes);

#[test]
fn test_global_registry_is_built_once() {
	let first = SHAPES.get_or_init_with(|| RegistryConfig::default().with_duplicates(DuplicatePolicy::Reject));
	assert!(SHAPES.is_initialized());
	let second = SHAPES.get();
	assert!(std::ptr::eq(first, second));
	assert_eq!(second.config().duplicates, DuplicatePolicy::Reject);
	assert_eq!(second.names(), vec!["circle"]);
	assert_eq!(second.format(), "json");
}
