// Analysis session: inputs, submission gate, lifecycle state machine and the
// transport that carries one request to the analysis service.

pub mod gate;
pub mod inputs;
pub mod machine;
pub mod state;
pub mod transport;

pub use gate::{can_submit, GateError};
pub use inputs::{Document, Role, PRESET_ROLES};
pub use machine::{AnalysisSession, SubmitError, Submission};
pub use state::{AnalysisState, FailureReason};
pub use transport::{AnalysisTransport, HttpTransport, TransportError};
