//! # ミドルウェア
//!
//! ルーターに適用する独自のミドルウェアを提供する。
//! 汎用的なもの（CORS、圧縮、タイムアウトなど）は `tower-http` を使用する。

mod clean_path;
mod throttle;

pub use clean_path::clean_path;
pub use throttle::{ThrottleState, throttle};
