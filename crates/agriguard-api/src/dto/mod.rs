mod request;
mod response;

pub use request::AnalyzeRequest;
pub use response::{
    AnalysisResponse, BoundaryResponse, DeleteResponse, HealthResponse, ResultResponse,
    SessionResponse,
};
