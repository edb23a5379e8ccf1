use alloc::string::String;
use alloc::sync::Arc;

use bk_reflect::{ProxyError, TypeKey};
use thiserror::Error;

use crate::definition::DefinitionId;

// -----------------------------------------------------------------------------
// DefinitionError

/// A fatal failure while building a component definition.
///
/// Definition errors are not retryable: a definition that fails any step
/// is never registered and bootstrap is expected to abort.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DefinitionError {
    #[error("Definition {definition} inherits conflicting scopes {scopes} from its stereotypes and declares none")]
    AmbiguousScope { definition: DefinitionId, scopes: String },

    #[error("{element} declares more than one scope: {scopes}")]
    MultipleScopes { element: String, scopes: String },

    #[error("Definition {definition} declares more than one deployment type: {found}")]
    MultipleDeploymentTypes { definition: DefinitionId, found: String },

    #[error("No deployment type resolves for definition {0}")]
    MissingDeploymentType(DefinitionId),

    #[error("Definition {0} has the deployment type Standard, which is reserved for container-internal types")]
    StandardNotAllowed(DefinitionId),

    #[error("Definition {definition} does not implement {required}, required by its stereotypes")]
    MissingRequiredType {
        definition: DefinitionId,
        required: TypeKey,
    },

    #[error("Stereotype {stereotype} is invalid: {reason}")]
    InvalidStereotype {
        stereotype: Arc<str>,
        reason: &'static str,
    },

    #[error("Tag type {tag} is not a {expected}")]
    UnknownMeta { tag: Arc<str>, expected: &'static str },

    #[error("Definition {definition} is not a decorator but declares the decoration point {point}")]
    DecorationPointOnNonDecorator {
        definition: DefinitionId,
        point: String,
    },

    #[error("Decorator {definition} must declare exactly one decoration point, found {found}")]
    DecorationPointCount { definition: DefinitionId, found: usize },

    #[error("Definition {successor} and the definition {predecessor} it specializes both declare a name")]
    SpecializationNameConflict {
        successor: DefinitionId,
        predecessor: DefinitionId,
    },

    #[error("Definition {0} specializes, but the definition it specializes is not deployed")]
    MissingPredecessor(DefinitionId),

    #[error("Definition {0} cannot be specialized this way")]
    InvalidSpecialization(DefinitionId),

    #[error("Producer {0} specializes, but does not override a producer of the superclass")]
    ProducerNotOverriding(DefinitionId),

    #[error("Specialization map is frozen, {predecessor} -> {successor} was rejected")]
    SpecializationFrozen {
        predecessor: DefinitionId,
        successor: DefinitionId,
    },

    #[error("Class {0} is a non-static inner class and cannot be a managed definition")]
    InnerClass(TypeKey),

    #[error("Class {0} is abstract and not a decorator")]
    AbstractClass(TypeKey),

    #[error("Definition {definition} has the passivating scope {scope} but is not serializable")]
    PassivatingNotSerializable {
        definition: DefinitionId,
        scope: Arc<str>,
    },

    #[error("Definition {definition} declares the public field {field} and must be Dependent scoped")]
    PublicFieldNotDependent {
        definition: DefinitionId,
        field: Arc<str>,
    },

    #[error("Producer {0} must not have a type variable as its type")]
    ProducerTypeVariable(DefinitionId),

    #[error("Class {0} is not declared as a container-internal type")]
    NotBuiltIn(TypeKey),

    #[error(transparent)]
    Proxy(#[from] ProxyError),
}
