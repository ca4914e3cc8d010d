pub mod memory;
pub mod redis;

pub use memory::MemoryDecisionCache;
pub use redis::RedisDecisionCache;
