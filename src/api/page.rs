//! The single research page, served in one of two modes:
//! the input form when credentials are present, setup instructions
//! when they are not.

use axum::{extract::State, response::Html};

use super::AppState;

/// GET /
pub async fn index(State(state): State<AppState>) -> Html<String> {
    if state.config.is_ready() {
        Html(ready_page())
    } else {
        Html(setup_page())
    }
}

/// Form variant, shown when both credentials were found at startup.
pub fn ready_page() -> String {
    format!("{}{}{}", PAGE_HEAD, READY_BODY, PAGE_FOOT)
}

/// Setup variant, shown for the whole process lifetime when either
/// credential is missing.
pub fn setup_page() -> String {
    format!("{}{}{}", PAGE_HEAD, SETUP_BODY, PAGE_FOOT)
}

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>AI Research Agent</title>
<style>
  body { font-family: -apple-system, "Segoe UI", Roboto, sans-serif; margin: 0; background: #fafafa; color: #222; }
  .wrap { max-width: 1100px; margin: 0 auto; padding: 2rem 3rem; }
  h1 { font-size: 2rem; }
  .tagline { color: #555; margin-bottom: 2rem; }
  .fields { display: flex; gap: 2rem; margin-bottom: 1.5rem; }
  .field { flex: 1; display: flex; flex-direction: column; }
  label { font-weight: 600; margin-bottom: 0.4rem; }
  input { padding: 0.6rem; font-size: 1rem; border: 1px solid #ccc; border-radius: 6px; }
  button { background: #e03131; color: #fff; border: none; border-radius: 6px; padding: 0.7rem 1.4rem; font-size: 1rem; cursor: pointer; }
  button:disabled { background: #aaa; cursor: wait; }
  .banner { margin-top: 1.5rem; padding: 0.9rem 1.1rem; border-radius: 6px; display: none; }
  .banner.warning { background: #fff3cd; border: 1px solid #ffe69c; }
  .banner.error { background: #f8d7da; border: 1px solid #f1aeb5; }
  .banner.busy { background: #e7f1ff; border: 1px solid #b6d4fe; }
  #result { margin-top: 1.5rem; display: none; }
  hr { border: none; border-top: 1px solid #ddd; margin: 1.5rem 0; }
  pre { background: #f1f3f5; padding: 0.8rem; overflow-x: auto; border-radius: 6px; }
</style>
</head>
<body>
<div class="wrap">
<h1>&#129302; AI Research Agent</h1>
<p class="tagline">This agent uses AI to research a company and a specific job role, providing a detailed summary.</p>
"#;

const PAGE_FOOT: &str = "</div>\n</body>\n</html>\n";

const READY_BODY: &str = r#"<form id="research-form">
  <div class="fields">
    <div class="field">
      <label for="company">Enter Company Name:</label>
      <input id="company" type="text" placeholder="e.g., Google, Microsoft" autocomplete="off">
    </div>
    <div class="field">
      <label for="role">Enter Job Role:</label>
      <input id="role" type="text" placeholder="e.g., Software Engineer, Product Manager" autocomplete="off">
    </div>
  </div>
  <button id="go" type="submit">Start Research</button>
</form>
<div id="busy" class="banner busy"></div>
<div id="warning" class="banner warning"></div>
<div id="error" class="banner error"></div>
<div id="result"><hr><h2>Research Summary</h2><div id="summary"></div></div>
<script>
const form = document.getElementById('research-form');
const button = document.getElementById('go');
const busy = document.getElementById('busy');
const warning = document.getElementById('warning');
const error = document.getElementById('error');
const result = document.getElementById('result');
const summary = document.getElementById('summary');

function reset() {
  for (const el of [busy, warning, error, result]) el.style.display = 'none';
  summary.innerHTML = '';
}

form.addEventListener('submit', async (event) => {
  event.preventDefault();
  reset();

  const company = document.getElementById('company').value;
  const role = document.getElementById('role').value;

  // The trigger stays disabled while a request is in flight; the server
  // refuses overlapping requests as well.
  button.disabled = true;
  busy.textContent = 'Researching ' + company + ' for the role of ' + role + '... This may take a moment.';
  busy.style.display = 'block';

  try {
    const response = await fetch('/api/research', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ company_name: company, job_role: role }),
    });
    const body = await response.json();
    busy.style.display = 'none';

    if (!response.ok) {
      error.textContent = body.message;
      error.style.display = 'block';
    } else if (body.status === 'success') {
      summary.innerHTML = body.summary_html;
      result.style.display = 'block';
    } else if (body.status === 'rejected_input') {
      warning.textContent = body.message;
      warning.style.display = 'block';
    } else {
      error.textContent = body.message;
      error.style.display = 'block';
    }
  } catch (e) {
    busy.style.display = 'none';
    error.textContent = 'An error occurred during the research process: ' + e;
    error.style.display = 'block';
  } finally {
    button.disabled = false;
  }
});
</script>
"#;

const SETUP_BODY: &str = r#"<div class="banner error" style="display: block">
API keys not found. Please add your GOOGLE_API_KEY and TAVILY_API_KEY to your secrets.
</div>
<p>Create a file named <code>secrets.toml</code> in the working directory (or set the
environment variables directly) and restart the server:</p>
<pre>GOOGLE_API_KEY = "your_google_api_key_here"
TAVILY_API_KEY = "your_tavily_api_key_here"</pre>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_page_shows_the_form() {
        let page = ready_page();
        assert!(page.contains("e.g., Google, Microsoft"));
        assert!(page.contains("e.g., Software Engineer, Product Manager"));
        assert!(page.contains("Start Research"));
        assert!(page.contains("Research Summary"));
    }

    #[test]
    fn setup_page_names_both_keys() {
        let page = setup_page();
        assert!(page.contains("GOOGLE_API_KEY"));
        assert!(page.contains("TAVILY_API_KEY"));
        assert!(page.contains("secrets.toml"));
        assert!(!page.contains("research-form"));
    }
}
