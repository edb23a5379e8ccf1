//! Names of the tag types the container itself gives a meaning to.

// -----------------------------------------------------------------------------
// Bindings

/// The default binding of definitions and injection points.
pub const CURRENT: &str = "Current";
/// Carried by every definition.
pub const ANY: &str = "Any";
/// Exposes a definition under a name. An empty value requests the default name.
pub const NAMED: &str = "Named";

// -----------------------------------------------------------------------------
// Scopes

pub const DEPENDENT: &str = "Dependent";
pub const REQUEST_SCOPED: &str = "RequestScoped";
pub const SESSION_SCOPED: &str = "SessionScoped";
pub const CONVERSATION_SCOPED: &str = "ConversationScoped";
pub const APPLICATION_SCOPED: &str = "ApplicationScoped";

// -----------------------------------------------------------------------------
// Deployment types

/// Reserved for container-internal definitions.
pub const STANDARD: &str = "Standard";
pub const PRODUCTION: &str = "Production";

// -----------------------------------------------------------------------------
// Markers

pub const SPECIALIZES: &str = "Specializes";
pub const INJECT: &str = "Inject";
pub const PRODUCES: &str = "Produces";
pub const DECORATOR: &str = "Decorator";
pub const DECORATES: &str = "Decorates";
/// Marks a member of a binding type that is ignored when matching.
pub const NON_BINDING: &str = "NonBinding";

// -----------------------------------------------------------------------------
// Meta-annotations

/// Declared on a tag type to make it a binding.
pub const BINDING_TYPE: &str = "BindingType";
/// Declared on a tag type to make it a pseudo scope.
pub const SCOPE_TYPE: &str = "ScopeType";
/// Declared on a tag type to make it a normal scope. The `passivating`
/// member set to `"true"` makes the scope passivating.
pub const NORMAL_SCOPE: &str = "NormalScope";
pub const DEPLOYMENT_TYPE: &str = "DeploymentType";
pub const STEREOTYPE: &str = "Stereotype";
pub const INTERCEPTOR_BINDING_TYPE: &str = "InterceptorBindingType";
