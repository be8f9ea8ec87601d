//! 用户凭据存储层
//!
//! 处理器只依赖 `UserRepositoryTrait`，当前实现为进程内存存储，
//! 替换为持久化后端时无需改动处理器。

mod memory;
mod traits;

pub use memory::MemoryUserRepository;
pub use traits::*;
