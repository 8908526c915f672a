//! Template helpers and the pure text transforms behind them.

use std::sync::OnceLock;

use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext,
    RenderErrorReason,
};
use moxydoc_config::RenderConfig;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;

/// Characters kept verbatim in anchor slugs.
const SLUG_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'-');

/// How the `anchor` helper marks a heading.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AnchorStyle {
    /// `{#slug}` heading attributes.
    Markdown,
    /// `<a id="slug"></a>`.
    Html,
    Disabled,
}

/// Settings the helpers read. Bound to a registry when it is built.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RenderSettings {
    pub anchor_style: AnchorStyle,
    pub separator: String,
    pub language: String,
    pub show_access_modifiers: bool,
}

impl RenderSettings {
    pub fn from_config(config: &RenderConfig) -> Self {
        let anchor_style = match (config.anchors, config.html_anchors) {
            (false, _) => AnchorStyle::Disabled,
            (true, true) => AnchorStyle::Html,
            (true, false) => AnchorStyle::Markdown,
        };
        RenderSettings {
            anchor_style,
            separator: config.separator.clone(),
            language: config.language.clone(),
            show_access_modifiers: config.show_access_modifiers,
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            anchor_style: AnchorStyle::Markdown,
            separator: "::".to_string(),
            language: "cpp".to_string(),
            show_access_modifiers: false,
        }
    }
}

/// Escape text for a Markdown table cell.
pub fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', "<br/>")
}

/// Keep a heading on one line.
pub fn escape_title(text: &str) -> String {
    text.replace('\n', "<br/>")
}

/// Anchor-safe form of `name`.
pub fn slug(name: &str, separator: &str) -> String {
    let joined = if separator.is_empty() {
        name.to_string()
    } else {
        name.replace(separator, "-")
    };
    utf8_percent_encode(&joined, SLUG_SET).to_string()
}

pub fn anchor(name: &str, settings: &RenderSettings) -> String {
    let slug = slug(name, &settings.separator);
    match settings.anchor_style {
        AnchorStyle::Markdown => format!("{{#{slug}}}"),
        AnchorStyle::Html => format!("<a id=\"{slug}\"></a>"),
        AnchorStyle::Disabled => String::new(),
    }
}

/// Remove emphasis markers and unwrap inline links.
pub fn strip_markdown(text: &str) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"(?:__|[*#])|\[(.*?)\]\(.*?\)").expect("markdown pattern is valid")
    });
    pattern.replace_all(text, "$1").into_owned()
}

pub fn strip_access_modifiers(text: &str) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"\b(?:public|protected|private)\b\s*").expect("access pattern is valid")
    });
    pattern.replace_all(text, "").into_owned()
}

/// Register every helper against `settings`, replacing earlier registrations.
pub(crate) fn register_helpers(handlebars: &mut Handlebars<'static>, settings: &RenderSettings) {
    handlebars.register_helper("cell", Box::new(cell_helper));
    handlebars.register_helper("title", Box::new(title_helper));
    handlebars.register_helper("stripmarkdown", Box::new(strip_markdown_helper));
    handlebars.register_helper(
        "anchor",
        Box::new(AnchorHelper {
            settings: settings.clone(),
        }),
    );
    handlebars.register_helper(
        "adjust-access-modifiers",
        Box::new(AccessModifierHelper {
            show: settings.show_access_modifiers,
        }),
    );
    handlebars.register_helper(
        "language",
        Box::new(LanguageHelper {
            language: settings.language.clone(),
        }),
    );
}

/// First positional parameter as text. `null` renders as empty.
fn text_param(h: &Helper, helper: &'static str) -> Result<String, handlebars::RenderError> {
    let param = h
        .param(0)
        .ok_or(RenderErrorReason::ParamNotFoundForIndex(helper, 0))?;
    let value = param.value();
    Ok(match value {
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn cell_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let text = text_param(h, "cell")?;
    out.write(&escape_cell(&text))?;
    Ok(())
}

fn title_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let text = text_param(h, "title")?;
    out.write(&escape_title(&text))?;
    Ok(())
}

fn strip_markdown_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let text = text_param(h, "stripmarkdown")?;
    out.write(&strip_markdown(&text))?;
    Ok(())
}

struct AnchorHelper {
    settings: RenderSettings,
}

impl HelperDef for AnchorHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let name = text_param(h, "anchor")?;
        out.write(&anchor(&name, &self.settings))?;
        Ok(())
    }
}

struct AccessModifierHelper {
    show: bool,
}

impl HelperDef for AccessModifierHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let text = text_param(h, "adjust-access-modifiers")?;
        if self.show {
            out.write(&text)?;
        } else {
            out.write(&strip_access_modifiers(&text))?;
        }
        Ok(())
    }
}

struct LanguageHelper {
    language: String,
}

impl HelperDef for LanguageHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        _: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        out.write(&self.language)?;
        Ok(())
    }
}
