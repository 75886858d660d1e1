//! Integration tests for template resolution against an HTML host document

use serde_json::{Value, json};
use template_cache::core::templates::{to_canonical_key, to_element_identifier};
use template_cache::{
    Config, EngineKind, Error, HtmlDocument, MemoryElementStore, RetentionPolicy, SharedTemplateManager,
    TemplateManager, TemplateSettings,
};

const TEMPLATE_ID_1: &str = "paragraph";
const TEMPLATE_ID_2: &str = "person";
const TEMPLATE_CODE_1: &str = "<p><%= data.text %><p>";
const TEMPLATE_CODE_2: &str = "<ul>
<% for person in data %>
<li><%= person.name ~ ': ' ~ person.age %></li>
<% endfor %>
</ul>";

fn page() -> String {
    format!(
        r#"<html><body>
<script type="text/template" id="template-{TEMPLATE_ID_1}">{TEMPLATE_CODE_1}</script>
<script type="text/template" id="template-{TEMPLATE_ID_2}">
{TEMPLATE_CODE_2}
</script>
<script type="text/template" id="template-wrapped"><!-- <b><%= data.title %></b> --></script>
<script type="text/template" id="template-plain"><p>foobar</p></script>
<div hidden id="template-inline"><em><%= data.text %></em></div>
</body></html>"#
    )
}

fn data_1() -> Value {
    json!({"text": "Hello world!"})
}

fn data_2() -> Value {
    json!([
        {"name": "Peter", "age": "31"},
        {"name": "Judy", "age": "24"}
    ])
}

fn clean(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[test]
fn test_get_template_from_document_render_and_cache() {
    let mut manager = TemplateManager::new().with_element_store(HtmlDocument::parse(&page()));
    assert!(manager.source_cache().is_empty());
    assert!(manager.compiled_cache().is_empty());

    assert_eq!(manager.render(TEMPLATE_ID_1, &data_1()), "<p>Hello world!<p>");
    assert_eq!(
        clean(&manager.render(TEMPLATE_ID_2, &data_2())),
        "<ul> <li>Peter: 31</li> <li>Judy: 24</li> </ul>"
    );

    assert_eq!(
        manager.source_cache().get(TEMPLATE_ID_1).map(String::as_str),
        Some(TEMPLATE_CODE_1)
    );
    assert_eq!(
        manager.source_cache().get(TEMPLATE_ID_2).map(String::as_str),
        Some(TEMPLATE_CODE_2)
    );
    assert!(manager.compiled_cache().has(TEMPLATE_ID_1));
    assert!(manager.compiled_cache().has(TEMPLATE_ID_2));
}

#[test]
fn test_added_template_takes_precedence_over_document() {
    let mut manager = TemplateManager::new().with_element_store(HtmlDocument::parse(&page()));
    manager.add(TEMPLATE_ID_1, "<h1><%= data.text %></h1>");

    assert_eq!(manager.render(TEMPLATE_ID_1, &data_1()), "<h1>Hello world!</h1>");
}

#[test]
fn test_render_matches_direct_compilation() {
    use template_cache::{MiniJinjaCompiler, Renderer, TemplateCompiler};

    let settings = TemplateSettings::default();
    let direct = MiniJinjaCompiler::new()
        .compile(TEMPLATE_CODE_2, &settings)
        .unwrap()
        .render(&data_2())
        .unwrap();

    let mut manager = TemplateManager::new();
    manager.add(TEMPLATE_ID_2, TEMPLATE_CODE_2);
    assert_eq!(manager.render(TEMPLATE_ID_2, &data_2()), direct);
}

#[test]
fn test_overwrite_never_serves_stale_output() {
    let mut manager = TemplateManager::new();
    manager.add("k", "one <%= data.text %>");
    assert_eq!(manager.render("k", &data_1()), "one Hello world!");

    manager.add("#template-k", "two <%= data.text %>");
    assert_eq!(manager.render("k", &data_1()), "two Hello world!");
}

#[test]
fn test_remove_then_render_without_document() {
    let mut manager = TemplateManager::new();
    manager.add(TEMPLATE_ID_1, TEMPLATE_CODE_1);
    manager.render(TEMPLATE_ID_1, &data_1());

    assert!(manager.remove(TEMPLATE_ID_1));
    assert_eq!(manager.render(TEMPLATE_ID_1, &data_1()), "");
    assert!(!manager.source_cache().has(TEMPLATE_ID_1));
    assert!(!manager.compiled_cache().has(TEMPLATE_ID_1));
}

#[test]
fn test_unknown_template_leaves_caches_empty() {
    let mut manager = TemplateManager::new().with_element_store(MemoryElementStore::new());
    assert_eq!(manager.render("nothing-here", &data_1()), "");
    assert!(manager.source_cache().is_empty());
    assert!(manager.compiled_cache().is_empty());
}

#[test]
fn test_document_code_that_is_not_a_template() {
    let mut manager = TemplateManager::new().with_element_store(HtmlDocument::parse(&page()));
    assert_eq!(manager.render("plain", &data_1()), "");
    assert!(!manager.source_cache().has("plain"));
}

#[test]
fn test_comment_wrapped_document_code() {
    let document = HtmlDocument::parse(&page());
    let data = json!({"title": "Card"});

    let mut manager = TemplateManager::new().with_element_store(document.clone());
    assert_eq!(manager.render("wrapped", &data), "<!-- <b>Card</b> -->");

    let settings = TemplateSettings::default().with_unwrap_comment_tag(true);
    let mut manager = TemplateManager::new()
        .with_settings(settings)
        .with_element_store(document);
    assert_eq!(manager.render("wrapped", &data), "<b>Card</b>");
    assert_eq!(
        manager.source_cache().get("wrapped").map(String::as_str),
        Some("<b><%= data.title %></b>")
    );
}

#[test]
fn test_release_policy_with_document() {
    let settings = TemplateSettings::default().with_retention(RetentionPolicy::Release);
    let mut manager = TemplateManager::new()
        .with_settings(settings)
        .with_element_store(HtmlDocument::parse(&page()));

    assert_eq!(manager.render(TEMPLATE_ID_1, &data_1()), "<p>Hello world!<p>");
    assert!(!manager.source_cache().has(TEMPLATE_ID_1));
    assert!(manager.compiled_cache().has(TEMPLATE_ID_1));
}

#[test]
fn test_tera_engine_from_config() {
    let config = Config::from_toml_str(r#"engine = "tera""#).unwrap();
    let mut document = MemoryElementStore::new();
    document.insert(
        "template-list",
        "{% for p in data %}{{ p.name }};{% endfor %}",
    );
    document.insert("template-angle", TEMPLATE_CODE_1);

    let mut manager = TemplateManager::from_config(&config).with_element_store(document);
    assert_eq!(manager.render("list", &data_2()), "Peter;Judy;");
    // `<% %>` code does not pass the heuristic with Tera markers
    assert_eq!(manager.render("angle", &data_1()), "");
}

#[test]
fn test_id_normalization_properties() {
    for (a, b) in [
        ("x", "#template-x"),
        ("  x ", "!x"),
        ("template-x", "##!template-x"),
    ] {
        assert_eq!(to_canonical_key(a), to_canonical_key(b));
    }
    for x in ["x", "template-y", "  z  "] {
        let element_id = to_element_identifier(x);
        assert_eq!(
            to_element_identifier(&to_canonical_key(&element_id)),
            element_id
        );
    }
}

#[test]
fn test_shared_manager() {
    let shared = SharedTemplateManager::from(
        TemplateManager::new().with_element_store(HtmlDocument::parse(&page())),
    );

    let workers: Vec<_> = (0..8)
        .map(|_| {
            let shared = shared.clone();
            std::thread::spawn(move || shared.render(TEMPLATE_ID_1, &data_1()))
        })
        .collect();
    for worker in workers {
        assert_eq!(worker.join().unwrap(), "<p>Hello world!<p>");
    }
    assert!(shared.with_manager(|m| m.compiled_cache().has(TEMPLATE_ID_1)));
}

#[test]
fn test_template_in_any_element() {
    let mut manager = TemplateManager::new().with_element_store(HtmlDocument::parse(&page()));
    assert_eq!(manager.render("inline", &data_1()), "<em>Hello world!</em>");
}

#[test]
fn test_try_render_reports_failures() {
    let mut manager = TemplateManager::new().with_element_store(HtmlDocument::parse(&page()));
    assert!(matches!(
        manager.try_render("nothing-here", &data_1()),
        Err(Error::Lookup(_))
    ));
    assert!(matches!(
        manager.try_render("  ", &data_1()),
        Err(Error::InvalidId(_))
    ));

    manager.add("broken", "<%= data | no_such_filter %>");
    assert!(manager.try_render("broken", &data_1()).is_err());
    assert_eq!(manager.render("broken", &data_1()), "");

    manager.add("empty", "<% if data.missing %>x<% endif %>");
    assert_eq!(manager.try_render("empty", &data_1()).unwrap(), "");
}

#[test]
fn test_engine_override_replaces_file_markers() {
    let file = "[templates]\nwarn_on_overwrite = true\n";
    let config = Config::from_toml_str_with_engine(file, Some(EngineKind::Tera)).unwrap();
    let mut document = MemoryElementStore::new();
    document.insert("template-text", "{{ data.text }}");

    let mut manager = TemplateManager::from_config(&config).with_element_store(document);
    assert_eq!(manager.render("text", &data_1()), "Hello world!");
}
