//! Interop signature decisions and emitted declarations.

pub mod decision;
pub mod signature;

pub use decision::{
    direction_decoration, Decoration, DecisionEngine, MarshalHint, ParameterDecision,
    ReturnDecision, Target,
};
pub use signature::{
    Declaration, EmittedCallback, EmittedConstant, EmittedEnumeration, EmittedField,
    EmittedLayout, EmittedMember, EmittedParameter, EmittedSignal, EmittedSignature, Emitter,
    Folder, SignalArgument,
};
