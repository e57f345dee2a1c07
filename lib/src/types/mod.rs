mod handle;
mod ids;
mod response;
mod session;

pub use handle::{AdminValue, DEFAULT_TTL, DataValue, HandleRecord, ValueData, ValueEntry};
pub use ids::{IdError, SessionId, SignerId};
pub use response::{
    ApiResponse, HandleListResponse, HandleResponse, ResponseCode, ResponseEnvelope,
};
pub use session::{Session, SessionChallenge, SessionStatus};
