//! Renderer control operations
//!
//! AVTransport actions drive playback; the ConnectionManager action reports
//! which formats the renderer accepts.

mod get_protocol_info;
mod get_transport_info;
mod pause;
mod play;
mod set_av_transport_uri;
mod stop;

pub use get_protocol_info::{
    parse_sink, GetProtocolInfoOperation, GetProtocolInfoRequest, GetProtocolInfoResponse,
};
pub use get_transport_info::{
    GetTransportInfoOperation, GetTransportInfoRequest, GetTransportInfoResponse,
};
pub use pause::{PauseOperation, PauseRequest, PauseResponse};
pub use play::{PlayOperation, PlayRequest, PlayResponse};
pub use set_av_transport_uri::{
    SetAVTransportURIOperation, SetAVTransportURIRequest, SetAVTransportURIResponse,
};
pub use stop::{StopOperation, StopRequest, StopResponse};
