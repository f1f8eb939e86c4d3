use super::*;

#[test]
fn loading_icon_marks_the_button_busy() -> Result<()> {
    let mut page = installed_page()?;

    page.turn_button_to_loading_icon("analyze-button")?;
    page.assert_has_class("#analyze-button", "is-loading")?;

    // Marking twice keeps a single marker class.
    page.turn_button_to_loading_icon("analyze-button")?;
    let dump = page.dump_dom("#analyze-button")?;
    assert!(dump.contains(r#"class="is-loading""#), "dump: {dump}");
    Ok(())
}

#[test]
fn disable_buttons_sets_disabled_on_each_id() -> Result<()> {
    let html = r#"
        <button id='submit'>Send</button>
        <button id='retry'>Retry</button>
        "#;
    let mut page = Page::from_html(html)?;

    page.disable_buttons(&["submit", "retry"])?;
    assert!(page.is_disabled("#submit")?);
    assert!(page.is_disabled("#retry")?);
    Ok(())
}

#[test]
fn disabling_a_trigger_makes_its_clicks_go_nowhere() -> Result<()> {
    let html = r#"
        <button id='opener' class='open-info-modal' data-target='m'>?</button>
        <div id='m' class='modal'></div>
        "#;
    let mut page = Page::from_html(html)?;
    page.install_ui(UiConfig::default())?;

    page.disable_buttons(&["opener"])?;
    page.click("#opener")?;
    page.assert_not_class("#m", "is-active")?;
    Ok(())
}

#[test]
fn show_and_hide_toggle_the_hidden_marker() -> Result<()> {
    let html = r#"
        <p id='notice' class='hidden'>Saved.</p>
        "#;
    let mut page = Page::from_html(html)?;

    page.show_element("notice")?;
    page.assert_not_class("#notice", "hidden")?;

    page.hide_element("notice")?;
    page.assert_has_class("#notice", "hidden")?;

    // Both directions are idempotent.
    page.hide_element("notice")?;
    page.assert_has_class("#notice", "hidden")?;
    Ok(())
}

#[test]
fn helpers_report_missing_elements() -> Result<()> {
    let mut page = installed_page()?;

    for result in [
        page.turn_button_to_loading_icon("nope"),
        page.disable_buttons(&["analyze-button", "nope"]),
        page.show_element("nope"),
        page.hide_element("nope"),
    ] {
        match result.expect_err("missing id should fail") {
            Error::ElementNotFound(id) => assert_eq!(id, "nope"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
    Ok(())
}

#[test]
fn helpers_use_the_installed_vocabulary() -> Result<()> {
    let html = r#"
        <button id='go'>Go</button>
        <p id='note' class='is-invisible'>hi</p>
        "#;
    let config = UiConfig {
        loading_class: "is-busy".to_string(),
        hidden_class: "is-invisible".to_string(),
        ..UiConfig::default()
    };
    let mut page = Page::from_html(html)?;
    page.install_ui(config)?;

    page.turn_button_to_loading_icon("go")?;
    page.assert_has_class("#go", "is-busy")?;

    page.show_element("note")?;
    page.assert_not_class("#note", "is-invisible")?;
    Ok(())
}
