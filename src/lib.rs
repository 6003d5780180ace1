//! # Tauri 图标生成器 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │        前端 (拖放上传 + 质量滑块 + 进度条)  /  icongen CLI │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↕ Tauri IPC (Result<T, AppError>) + 进度事件
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            后端 (Rust)                           │
//! │                                                          │
//! │  ┌─ error ────────── AppError (统一错误类型)              │
//! │  │                                                       │
//! │  └─ icon_generator ─ 源图加载 · 清单渲染 · zip 打包        │
//! │      ├─ manifest     Windows / macOS / iOS / Linux / Android │
//! │      ├─ renderer     缩放 + 圆形遮罩 + PNG 编码           │
//! │      ├─ handler      状态机 + 进度 + 取消                 │
//! │      └─ archive      tauri-icons.zip                     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，所有 Tauri command 的返回类型 |
//! | [`icon_generator`] | 从单张源图生成整套 Tauri 图标并打包 |

pub mod error;
pub mod icon_generator;
