// 防止在 Windows 发布版本中显示额外的控制台窗口，不要删除！
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! # Tauri 图标生成器 — 桌面应用入口
//!
//! 本文件仅负责应用初始化与插件/命令注册。
//! 业务逻辑位于 `icon_generator` 模块，详见 `lib.rs` 架构文档。

use tauri_icon_generator::icon_generator;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    tauri::Builder::default()
        // 插件初始化
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_fs::init())
        // 注入图标生成服务
        .manage(icon_generator::IconServiceState::new())
        .setup(|_app| {
            log::info!("setup: complete");
            Ok(())
        })
        // 注册所有 Tauri 命令
        .invoke_handler(tauri::generate_handler![
            icon_generator::commands::load_source_image,
            icon_generator::commands::load_source_image_base64,
            icon_generator::commands::clear_source_image,
            icon_generator::commands::set_icon_quality,
            icon_generator::commands::get_icon_quality,
            icon_generator::commands::get_generation_status,
            icon_generator::commands::generate_icons,
            icon_generator::commands::cancel_icon_generation,
            icon_generator::commands::list_icon_manifest,
        ])
        .run(tauri::generate_context!())
        .expect("运行 Tauri 应用时出错");
}
