//! Maquette - interactive 3D scene staging editor core
//!
//! Keeps a declarative, serializable scene description in exact
//! correspondence with a live set of renderable nodes while supporting
//! single-object selection, gizmo manipulation, highlighting and a linear
//! undo/redo history.
//!
//! Rendering itself (rasterization, windowing, widget UI) is a collaborator
//! concern: the [`render`] module is the engine-facing surface the editor
//! drives, with tracked resources so teardown behavior stays observable.

pub mod app;
pub mod assets;
pub mod color;
pub mod history;
pub mod render;
pub mod scene;

pub use app::Editor;
pub use scene::{ObjectId, ObjectKind, SceneObject, ShapeKind};
