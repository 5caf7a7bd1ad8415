//! API description model for the Trestle code generator.
//!
//! This crate defines the intermediate representation of an API design and
//! the linker that validates it. The types are deliberately split in two
//! layers:
//!
//! ```text
//! design document → ApiDefinition (raw, order-preserving) → link → LinkedApi
//! ```
//!
//! The raw model is what the upstream design surface produces: plain
//! vectors of definitions holding by-name references. [`link`] resolves
//! every reference, merges resource-level params and headers into each
//! action, and builds name-keyed registries — or reports every problem it
//! found in one batch of [`LinkError`]s.
//!
//! The raw model derives `Serialize`/`Deserialize` so design documents can
//! be loaded from JSON or TOML; the linked model is an in-memory structure
//! scoped to one generation run.

mod api;
mod attribute;
mod error;
mod link;
mod media;
mod resource;
mod security;

pub use api::ApiDefinition;
pub use attribute::{AttributeDefinition, AttributeType, Primitive, Validation};
pub use error::{LinkError, LinkErrors};
pub use link::{LinkedAction, LinkedApi, LinkedResource, link};
pub use media::{
    BUILTIN_IDENTIFIERS, MediaTypeDefinition, UserTypeDefinition, ViewDefinition,
};
pub use resource::{
    ActionDefinition, FileServerDefinition, ResourceDefinition, ResponseDefinition,
    RouteDefinition,
};
pub use security::{SchemeKind, SecurityScheme};
