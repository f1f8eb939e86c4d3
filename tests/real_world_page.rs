//! Drives the full analyzer landing page (upload form, analyze button,
//! info and privacy modals) through realistic user journeys.

use modal_harness::{Page, Result, UiConfig};

const ANALYZER_PAGE: &str = r#"
<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Document Analyzer</title>
</head>
<body>
  <section class="section">
    <form id="form" action="/analyze" method="post">
      <div id="file-upload" class="file has-name">
        <label class="file-label">
          <input class="file-input" type="file" name="document">
          <span class="file-cta">Choose a file</span>
          <span class="file-name">No file selected</span>
        </label>
      </div>
      <button id="analyze-button" class="button is-primary" type="button">Analyze</button>
      <p id="upload-hint" class="help hidden">Analysis can take a minute.</p>
    </form>

    <button class="open-info-modal" data-target="about-modal">What is this?</button>
    <button class="open-info-modal" data-target="privacy-modal">Privacy</button>
  </section>

  <div id="about-modal" class="modal">
    <div class="modal-background"></div>
    <div class="modal-card">
      <header class="modal-card-head">
        <p class="modal-card-title">About</p>
        <button class="delete" aria-label="close"></button>
      </header>
      <section class="modal-card-body">
        We analyze the uploaded document &amp; report the findings.
      </section>
      <footer class="modal-card-foot">
        <button class="button">Got it</button>
      </footer>
    </div>
  </div>

  <div id="privacy-modal" class="modal">
    <div class="modal-background"></div>
    <div class="modal-content"><p>Files never leave your machine.</p></div>
    <button class="modal-close" aria-label="close"></button>
  </div>
</body>
</html>
"#;

fn installed(rebind_on_pageshow: bool) -> Result<Page> {
    let mut page = Page::from_html(ANALYZER_PAGE)?;
    page.install_ui(UiConfig {
        rebind_on_pageshow,
        ..UiConfig::default()
    })?;
    Ok(page)
}

#[test]
fn upload_then_analyze_journey() -> Result<()> {
    let mut page = installed(false)?;

    page.assert_text("#file-upload .file-name", "No file selected")?;
    page.select_files("#file-upload input[type=file]", &["quarterly-report.pdf"])?;
    page.assert_text("#file-upload .file-name", "quarterly-report.pdf")?;

    // The analyze click handler is app glue; the page only provides the
    // busy/disable/visibility toggles it calls.
    page.turn_button_to_loading_icon("analyze-button")?;
    page.disable_buttons(&["analyze-button"])?;
    page.show_element("upload-hint")?;

    page.assert_has_class("#analyze-button", "is-loading")?;
    assert!(page.is_disabled("#analyze-button")?);
    page.assert_not_class("#upload-hint", "hidden")?;

    // Disabled button clicks go nowhere.
    page.click("#analyze-button")?;
    Ok(())
}

#[test]
fn modal_journey_across_both_modals() -> Result<()> {
    let mut page = installed(false)?;

    page.click("[data-target=about-modal]")?;
    page.assert_has_class("#about-modal", "is-active")?;
    page.assert_not_class("#privacy-modal", "is-active")?;

    page.click("#about-modal .modal-card-foot .button")?;
    page.assert_not_class("#about-modal", "is-active")?;

    page.click("[data-target=privacy-modal]")?;
    page.click("[data-target=about-modal]")?;
    page.assert_has_class("#about-modal", "is-active")?;
    page.assert_has_class("#privacy-modal", "is-active")?;

    page.press_key("Escape")?;
    page.assert_not_class("#about-modal", "is-active")?;
    page.assert_not_class("#privacy-modal", "is-active")?;
    Ok(())
}

#[test]
fn dismissers_only_reach_their_own_modal() -> Result<()> {
    let mut page = installed(false)?;

    page.click("[data-target=about-modal]")?;
    page.click("[data-target=privacy-modal]")?;

    page.click("#privacy-modal .modal-close")?;
    page.assert_has_class("#about-modal", "is-active")?;
    page.assert_not_class("#privacy-modal", "is-active")?;

    page.click("#about-modal .modal-background")?;
    page.assert_not_class("#about-modal", "is-active")?;
    Ok(())
}

#[test]
fn cache_restore_variant_keeps_mirroring_after_pageshow() -> Result<()> {
    let mut page = installed(true)?;

    page.select_files("#file-upload input[type=file]", &["before.pdf"])?;
    page.assert_text("#file-upload .file-name", "before.pdf")?;

    // Back-forward navigation: the page fires pageshow again.
    page.page_show()?;
    page.select_files("#file-upload input[type=file]", &["after.pdf"])?;
    page.assert_text("#file-upload .file-name", "after.pdf")?;

    // Canceling the picker leaves the last mirrored name alone.
    page.select_files("#file-upload input[type=file]", &[])?;
    page.assert_text("#file-upload .file-name", "after.pdf")?;
    Ok(())
}

#[test]
fn escape_by_legacy_key_code_matches_named_escape() -> Result<()> {
    let mut page = installed(false)?;

    page.click("[data-target=about-modal]")?;
    page.press_key_code(27)?;
    page.assert_not_class("#about-modal", "is-active")?;

    page.click("[data-target=about-modal]")?;
    page.press_key("Escape")?;
    page.assert_not_class("#about-modal", "is-active")?;
    Ok(())
}
