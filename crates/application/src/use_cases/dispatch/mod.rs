mod dispatch_request;
mod target;

pub use dispatch_request::DispatchRequestUseCase;
pub use target::RequestTarget;
