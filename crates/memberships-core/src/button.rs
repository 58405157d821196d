//! Purchase Button Rendering
//!
//! Validates untrusted caller attributes and renders the purchase-button
//! fragment, or nothing at all. A broken button must never break the
//! surrounding page, so every failure here is silent no-output.

use serde::{Deserialize, Serialize};

use crate::escape;
use crate::model::PlanId;
use crate::plans::PlanRepository;

/// Base CSS classes carried by every rendered button
const BASE_CLASSES: &[&str] = &["memberships-button", "components-button", "is-primary"];

/// Untrusted caller attributes for a button render.
///
/// Field names match the caller-facing attribute surface. A render never
/// mutates plan state; it is a pure read.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ButtonRenderRequest {
    /// Raw plan id attribute; must parse to a positive integer
    pub plan_id: Option<String>,

    /// Label override, run through the restrictive sanitizer
    pub submit_button_text: Option<String>,

    /// Background color; dropped silently unless it is a valid hex color
    pub custom_background_color: Option<String>,

    /// Text color; dropped silently unless it is a valid hex color
    pub custom_text_color: Option<String>,

    /// Caller-supplied class appended to the class list
    pub extra_css_class: Option<String>,
}

/// Outcome of a button render
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Sanitized HTML fragment ready for embedding
    Markup(String),
    /// Render nothing; the defined behavior for every invalid request
    NoRender,
}

impl RenderOutcome {
    /// The fragment, if one was rendered
    pub fn as_html(&self) -> Option<&str> {
        match self {
            RenderOutcome::Markup(html) => Some(html),
            RenderOutcome::NoRender => None,
        }
    }
}

/// Renderer configuration.
///
/// Label and attribution strings arrive already localized; translation is
/// the hosting side's concern.
#[derive(Clone, Debug)]
pub struct RendererConfig {
    /// Site the button belongs to
    pub site_id: u64,

    /// Locale tag emitted on the button
    pub locale: String,

    /// Prefix of the plan-scoped CSS class
    pub css_class_prefix: String,

    /// Button label when the caller supplies none
    pub default_label: String,

    /// Attribution line shown by the checkout overlay
    pub powered_by_text: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            site_id: 0,
            locale: "en".into(),
            css_class_prefix: "memberships".into(),
            default_label: "Your contribution".into(),
            powered_by_text: "Powered by Memberships".into(),
        }
    }
}

/// Renders purchase buttons for published plans
pub struct ButtonRenderer {
    config: RendererConfig,
}

impl ButtonRenderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Render a purchase button from untrusted attributes.
    ///
    /// Missing plan, wrong record kind, unpublished status, and malformed
    /// ids all degrade to [`RenderOutcome::NoRender`]. Identical inputs
    /// against an unchanged repository yield byte-identical markup.
    pub fn render(
        &self,
        request: &ButtonRenderRequest,
        plans: &dyn PlanRepository,
    ) -> RenderOutcome {
        let Some(id) = request.plan_id.as_deref().and_then(PlanId::parse) else {
            return RenderOutcome::NoRender;
        };
        let Some(plan) = plans.find_plan(id) else {
            return RenderOutcome::NoRender;
        };
        if !plan.is_renderable() {
            tracing::debug!(plan_id = %plan.id, status = plan.status.as_str(), "Skipping unpublished plan");
            return RenderOutcome::NoRender;
        }

        let label = sanitize_button_label(
            request
                .submit_button_text
                .as_deref()
                .unwrap_or(&self.config.default_label),
        );

        let mut classes: Vec<String> = BASE_CLASSES.iter().map(|class| (*class).to_string()).collect();
        classes.push(format!("{}-{}", self.config.css_class_prefix, plan.id));
        if let Some(extra) = &request.extra_css_class {
            classes.push(extra.clone());
        }

        let mut styles: Vec<String> = Vec::new();
        if let Some(color) = request
            .custom_background_color
            .as_deref()
            .and_then(normalize_hex_color)
        {
            styles.push(format!("background-color: {}", color));
        }
        if let Some(color) = request
            .custom_text_color
            .as_deref()
            .and_then(normalize_hex_color)
        {
            styles.push(format!("color: {}", color));
        }

        let html = format!(
            "<button data-blog-id=\"{}\" data-powered-text=\"{}\" data-plan-id=\"{}\" data-lang=\"{}\" class=\"{}\" style=\"{}\">{}</button>",
            self.config.site_id,
            escape::attr(&self.config.powered_by_text),
            plan.id,
            escape::attr(&self.config.locale),
            escape::attr(&classes.join(" ")),
            escape::attr(&styles.join(";")),
            label,
        );

        RenderOutcome::Markup(html)
    }
}

/// Sanitize a button label: strip every tag except line breaks.
///
/// Surviving `<br>` variants are normalized to `<br />`; all remaining
/// text is escaped for the label slot.
pub fn sanitize_button_label(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(open) = rest.find('<') {
        out.push_str(&escape::text(&rest[..open]));
        let tail = &rest[open..];
        match tail.find('>') {
            Some(close) => {
                if is_line_break(&tail[..=close]) {
                    out.push_str("<br />");
                }
                rest = &tail[close + 1..];
            }
            None => {
                // Stray '<' with no closing bracket: plain text.
                out.push_str(&escape::text(tail));
                return out;
            }
        }
    }
    out.push_str(&escape::text(rest));
    out
}

fn is_line_break(tag: &str) -> bool {
    let inner = tag
        .trim_start_matches('<')
        .trim_end_matches('>')
        .trim_end_matches('/')
        .trim();
    inner.eq_ignore_ascii_case("br")
}

/// Validate a hex color attribute.
///
/// Returns the trimmed `#rgb`/`#rrggbb` value, or `None` when the input
/// is not a hex color.
pub fn normalize_hex_color(raw: &str) -> Option<&str> {
    let value = raw.trim();
    let digits = value.strip_prefix('#')?;
    if !matches!(digits.len(), 3 | 6) {
        return None;
    }
    digits
        .chars()
        .all(|ch| ch.is_ascii_hexdigit())
        .then_some(value)
}
