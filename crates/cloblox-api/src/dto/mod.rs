//! 请求和响应的数据传输对象

mod request;
mod response;

pub use request::*;
pub use response::*;
