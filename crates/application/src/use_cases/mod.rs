pub mod dispatch;

pub use dispatch::{DispatchRequestUseCase, RequestTarget};
