use super::*;

mod helpers_and_visibility;

/// The markup contract the default [`UiConfig`] was written for: an
/// upload form plus two modals wired to their triggers.
pub(crate) const UPLOAD_AND_MODALS_HTML: &str = r#"
    <form id='form'>
      <div id='file-upload'>
        <input type='file' name='document'>
        <span class='file-name'>No file selected</span>
      </div>
      <button id='analyze-button' type='button'>Analyze</button>
    </form>
    <button class='open-info-modal' data-target='info-modal'>About</button>
    <button class='open-info-modal' data-target='privacy-modal'>Privacy</button>
    <div id='info-modal' class='modal'>
      <div class='modal-background'></div>
      <div class='modal-card'>
        <header class='modal-card-head'>
          <p class='modal-card-title'>About</p>
          <button class='delete'></button>
        </header>
        <section class='modal-card-body'>Info body</section>
        <footer class='modal-card-foot'>
          <button class='button'>Done</button>
        </footer>
      </div>
    </div>
    <div id='privacy-modal' class='modal'>
      <div class='modal-background'></div>
      <button class='modal-close'></button>
    </div>
    "#;

pub(crate) fn installed_page() -> Result<Page> {
    let mut page = Page::from_html(UPLOAD_AND_MODALS_HTML)?;
    page.install_ui(UiConfig::default())?;
    Ok(page)
}

#[test]
fn trigger_click_then_close_button_round_trips_modal_state() -> Result<()> {
    let mut page = installed_page()?;

    page.assert_not_class("#info-modal", "is-active")?;
    page.click(".open-info-modal")?;
    page.assert_has_class("#info-modal", "is-active")?;

    page.click("#info-modal .modal-card-head .delete")?;
    page.assert_not_class("#info-modal", "is-active")?;
    Ok(())
}

#[test]
fn selecting_a_file_mirrors_its_name_into_the_label() -> Result<()> {
    let mut page = installed_page()?;

    page.select_files("#file-upload input[type=file]", &["report.pdf"])?;
    page.assert_text("#file-upload .file-name", "report.pdf")?;
    Ok(())
}
