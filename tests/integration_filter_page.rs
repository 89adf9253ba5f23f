use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use eureka_ui::components::{FilterControl, slot};
use eureka_ui::demo::{PageOptions, SearchPage};
use eureka_ui::dom::{Value, query_class};
use eureka_ui::host::Host;
use eureka_ui::{Dom, Element};

fn mount_filter(dom: &Dom) -> (Rc<RefCell<FilterControl>>, Rc<RefCell<Vec<Value>>>) {
    let reports = Rc::new(RefCell::new(Vec::new()));
    let r = reports.clone();
    let filter = slot::<FilterControl>();
    let node = Element::component::<FilterControl>()
        .prop("extensions", vec![".java", ".ts"])
        .on("onFilterChanged", move |_, ev| r.borrow_mut().push(ev.detail().clone()))
        .mount_into(&filter)
        .build(dom)
        .unwrap();
    dom.append_child(dom.body(), node);
    let filter = filter.borrow().clone().unwrap();
    (filter, reports)
}

#[test]
fn exclude_edits_report_once_after_quiet_period() {
    let dom = Dom::new();
    let (filter, reports) = mount_filter(&dom);
    let exclude = filter.borrow().exclude_input();
    dom.focus(exclude);
    dom.type_text("test");
    dom.advance_clock(Duration::from_millis(400));
    dom.run_due_timers();
    assert!(reports.borrow().is_empty());
    dom.advance_clock(Duration::from_millis(100));
    dom.run_due_timers();

    let reports = reports.borrow();
    assert_eq!(reports.len(), 1);
    let map = reports[0].as_map().unwrap();
    assert_eq!(map["exclude"], Value::from(vec!["test"]));
    assert_eq!(map["include"], Value::List(Vec::new()));
}

#[test]
fn space_on_checkbox_reports_selection() {
    let dom = Dom::new();
    let (filter, reports) = mount_filter(&dom);
    let boxes = filter.borrow().checkboxes().to_vec();
    dom.focus(boxes[1]);
    dom.press_key(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE));
    assert!(dom.checked(boxes[1]));
    assert_eq!(
        reports.borrow()[0].as_map().unwrap()["extensions"],
        Value::from(vec![".ts"])
    );
    assert_eq!(filter.borrow().selection(&dom), reports.borrow()[0]);
}

fn page_host() -> (Host, Rc<SearchPage>) {
    let dom = Dom::new();
    let page = SearchPage::mount(
        &dom,
        PageOptions {
            suggestions: vec!["SearchEngine".into(), "GitService".into()],
            free_text: false,
            extensions: vec![".java".into(), ".rs".into()],
        },
    )
    .unwrap();
    let mut host = Host::new(dom);
    host.resize(80, 24);
    page.fit(host.dom());
    (host, page)
}

fn key(host: &mut Host, code: KeyCode, modifiers: KeyModifiers) {
    host.handle_event(&Event::Key(KeyEvent::new(code, modifiers)));
}

#[test]
fn selecting_a_suggestion_updates_results_and_status() {
    let (mut host, page) = page_host();
    let input = page.combo().borrow().text_input();
    host.dom().focus(input);
    for c in "git".chars() {
        key(&mut host, KeyCode::Char(c), KeyModifiers::NONE);
    }
    assert_eq!(page.combo().borrow().dropdown_items(host.dom()), vec!["GitService"]);
    key(&mut host, KeyCode::Down, KeyModifiers::NONE);
    key(&mut host, KeyCode::Enter, KeyModifiers::NONE);
    assert_eq!(page.status(host.dom()), "Searching for: GitService");
    assert_eq!(
        host.dom().text_content(page.results()),
        "Results for \"GitService\""
    );
}

#[test]
fn extension_editor_round_trip_through_the_host() {
    let (mut host, page) = page_host();
    key(&mut host, KeyCode::Char('e'), KeyModifiers::CONTROL);
    host.tick();
    let editor = query_class(host.dom(), host.dom().body(), "extensions-dialog").unwrap();
    let textarea = host
        .dom()
        .descendants(editor)
        .into_iter()
        .find(|n| host.dom().tag(*n).as_deref() == Some("textarea"))
        .unwrap();
    assert_eq!(host.dom().input_value(textarea), ".java, .rs");
    assert_eq!(host.dom().active_element(), Some(textarea));

    for c in ", .kt".chars() {
        key(&mut host, KeyCode::Char(c), KeyModifiers::NONE);
    }
    key(&mut host, KeyCode::Tab, KeyModifiers::NONE);
    key(&mut host, KeyCode::Enter, KeyModifiers::NONE);
    assert_eq!(page.extensions(), vec![".java", ".rs", ".kt"]);
    assert_eq!(page.status(host.dom()), "Extensions: .java, .rs, .kt");
    assert_eq!(host.dom().modal_depth(), 0);
}

#[test]
fn about_box_closes_with_enter() {
    let (mut host, _page) = page_host();
    key(&mut host, KeyCode::F(1), KeyModifiers::NONE);
    host.tick();
    assert_eq!(host.dom().modal_depth(), 1);
    key(&mut host, KeyCode::Esc, KeyModifiers::NONE);
    assert_eq!(host.dom().modal_depth(), 1);
    key(&mut host, KeyCode::Enter, KeyModifiers::NONE);
    assert_eq!(host.dom().modal_depth(), 0);
}
