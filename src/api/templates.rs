//! HTML page rendering
//!
//! 模板文件通过 rust-embed 编译进二进制，启动时一次性交给 tera 解析。

use rust_embed::Embed;
use tera::{Context, Tera};
use tracing::{debug, error};

use crate::errors::{Result, SessionlinkerError};

#[derive(Embed)]
#[folder = "templates/"]
struct TemplateAssets;

pub struct PageRenderer {
    tera: Tera,
}

impl PageRenderer {
    /// Parse every embedded template
    pub fn new() -> Result<Self> {
        let mut sources = Vec::new();
        for name in TemplateAssets::iter() {
            let Some(file) = TemplateAssets::get(&name) else {
                continue;
            };
            let text = String::from_utf8(file.data.into_owned()).map_err(|e| {
                SessionlinkerError::template(format!("Template {} is not UTF-8: {}", name, e))
            })?;
            sources.push((name.to_string(), text));
        }

        let mut tera = Tera::default();
        // 一次性添加，保证 extends 的父模板能被找到
        tera.add_raw_templates(sources)?;
        debug!("Loaded {} page templates", tera.get_template_names().count());

        Ok(Self { tera })
    }

    pub fn render(&self, name: &str, context: &Context) -> Result<String> {
        self.tera.render(name, context).map_err(|e| {
            error!("Failed to render {}: {:?}", name, e);
            SessionlinkerError::from(e)
        })
    }
}
