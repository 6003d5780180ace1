//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载“加载 → 渲染 → 打包”整条链路的错误来源。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。
//! `code()` 提供稳定的机器可读标识，供前端与 CLI 区分错误类别。

/// 图标生成统一错误类型。
///
/// 该类型会在命令层被上转为 `AppError`，最终透传给前端。
#[derive(Debug, thiserror::Error)]
pub enum IconError {
    #[error("解码错误：{0}")]
    Decode(String),

    #[error("尚未加载源图片")]
    NoImage,

    #[error("渲染错误：{0}")]
    Render(String),

    #[error("打包错误：{0}")]
    Archive(String),

    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    #[error("配置错误：{0}")]
    InvalidConfig(String),

    #[error("已有图标生成任务在运行")]
    Busy,

    #[error("图标生成已取消")]
    Cancelled,
}

impl IconError {
    /// 稳定错误码，不随提示文案变化。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode",
            Self::NoImage => "no_image",
            Self::Render(_) => "render",
            Self::Archive(_) => "archive",
            Self::FileSystem(_) => "file_system",
            Self::ResourceLimit(_) => "resource_limit",
            Self::InvalidConfig(_) => "invalid_config",
            Self::Busy => "busy",
            Self::Cancelled => "cancelled",
        }
    }
}

impl From<IconError> for String {
    fn from(error: IconError) -> Self {
        error.to_string()
    }
}
