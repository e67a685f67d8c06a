#![cfg(target_arch = "wasm32")]

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Node};

const STYLE_TAG_SELECTOR: &str = "style[data-questionnaire-ui]";

/// Default CSS for the questionnaire and the access gate, with tokens that
/// host pages can override.
pub const DEFAULT_STYLES: &str = r#"
:root {
  --questionnaire-font-family: 'Inter', system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
  --questionnaire-bg: #ffffff;
  --questionnaire-text: #1f2933;
  --questionnaire-muted: #52606d;
  --questionnaire-border: rgba(148, 163, 184, 0.6);
  --questionnaire-radius: 12px;
  --questionnaire-accent: #2563eb;
  --questionnaire-focus-bg: rgba(37, 99, 235, 0.12);
  --guidance-green: rgba(6, 118, 71, 0.16);
  --guidance-yellow: rgba(234, 179, 8, 0.2);
  --guidance-red: rgba(180, 35, 24, 0.14);
  --guidance-gray: rgba(71, 84, 103, 0.1);
}

.questionnaire-root,
.access-root {
  font-family: var(--questionnaire-font-family);
  background: var(--questionnaire-bg);
  color: var(--questionnaire-text);
  padding: 24px;
}

.questionnaire-body {
  display: grid;
  gap: 24px;
  grid-template-columns: minmax(320px, 1.2fr) minmax(280px, 1fr);
}

.countdown {
  position: sticky;
  top: 0;
  font-variant-numeric: tabular-nums;
  font-weight: 600;
  text-align: right;
  color: var(--questionnaire-muted);
}

.question-prompt {
  line-height: 1.55;
}

.question-number {
  font-weight: 700;
}

.answer-field {
  position: relative;
}

.answer-input {
  width: 100%;
  box-sizing: border-box;
  padding: 10px 12px;
  font-size: 1rem;
  border: 2px solid var(--questionnaire-border);
  border-radius: var(--questionnaire-radius);
}

.answer-input.is-open {
  border-bottom-left-radius: 0;
  border-bottom-right-radius: 0;
}

.suggestion-list {
  position: absolute;
  z-index: 10;
  left: 0;
  right: 0;
  margin: 0;
  padding: 0;
  list-style: none;
  max-height: 260px;
  overflow-y: auto;
  background: var(--questionnaire-bg);
  border: 1px solid var(--questionnaire-border);
  border-top: none;
  border-radius: 0 0 var(--questionnaire-radius) var(--questionnaire-radius);
}

.suggestion {
  padding: 8px 12px;
  cursor: pointer;
}

.suggestion:hover,
.suggestion.is-focused {
  background: var(--questionnaire-focus-bg);
}

.question-controls {
  display: flex;
  align-items: center;
  justify-content: space-between;
  margin-top: 18px;
}

.question-progress {
  color: var(--questionnaire-muted);
}

.nav-button,
.submit-button,
.continue-button {
  padding: 8px 18px;
  border-radius: var(--questionnaire-radius);
  border: 1px solid var(--questionnaire-accent);
  background: var(--questionnaire-bg);
  color: var(--questionnaire-accent);
  cursor: pointer;
}

.submit-button,
.continue-button.is-ready {
  background: var(--questionnaire-accent);
  color: #ffffff;
}

.continue-button:disabled {
  opacity: 0.5;
  cursor: not-allowed;
}

.submit-row {
  margin-top: 24px;
  text-align: center;
}

.guidance-panel {
  margin-bottom: 12px;
  border: 1px solid var(--questionnaire-border);
  border-radius: var(--questionnaire-radius);
  padding: 8px 12px;
}

.guidance-panel summary {
  font-weight: 600;
  cursor: pointer;
}

.guidance-table {
  width: 100%;
  border-collapse: collapse;
  margin-top: 8px;
}

.guidance-table th,
.guidance-table td {
  text-align: left;
  padding: 6px 8px;
}

.guidance-row[data-category="green"] { background: var(--guidance-green); }
.guidance-row[data-category="yellow"] { background: var(--guidance-yellow); }
.guidance-row[data-category="red"] { background: var(--guidance-red); }
.guidance-row[data-category="gray"] { background: var(--guidance-gray); }

.guidance-radiation {
  white-space: nowrap;
}

.hp-field {
  position: absolute;
  left: -10000px;
  width: 1px;
  height: 1px;
  overflow: hidden;
}

.access-root {
  display: flex;
  flex-direction: column;
  gap: 16px;
  max-width: 640px;
}

.access-identifier {
  display: flex;
  flex-direction: column;
  gap: 6px;
}

.access-identifier input {
  font-family: ui-monospace, monospace;
  padding: 8px 10px;
}

.access-count {
  color: var(--questionnaire-muted);
  font-size: 0.85rem;
}

@media (max-width: 880px) {
  .questionnaire-body {
    grid-template-columns: 1fr;
  }
}
"#;

pub fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.query_selector(STYLE_TAG_SELECTOR)?.is_some() {
        return Ok(());
    }

    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("Document has no <head> element"))?;

    let style_el = document.create_element("style")?;
    style_el.set_attribute("data-questionnaire-ui", "v1")?;
    style_el.set_text_content(Some(DEFAULT_STYLES));
    head.append_child(&style_el.clone().dyn_into::<Node>()?)?;

    Ok(())
}
