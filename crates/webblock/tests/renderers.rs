//! The three renderer strategies driven through the element lifecycle.

use webblock::prelude::*;

fn list_card(document: &mut Document, tag: &str, kind: Option<RendererKind>) {
    let mut description = ComponentDescription::new(tag)
        .attributes(attributes! {
            items: |_el, raw| match raw {
                Some(text) if !text.is_empty() => {
                    PropValue::list(text.split(',').map(PropValue::from))
                }
                _ => PropValue::empty_list(),
            },
        })
        .style("li { color: red }")
        .render(|_, props| {
            let items = props.get("items").and_then(PropValue::as_list).unwrap_or(&[]);
            Node::element("ul")
                .children(items.iter().map(|item| {
                    Node::element("li").child(Node::text(item.as_text().unwrap_or_default()))
                }))
                .into()
        });
    if let Some(kind) = kind {
        description = description.renderer(kind);
    }
    document.define(description).unwrap();
}

const STYLE: &str = "<style>li { color: red }</style>";

#[test]
fn immediate_is_the_default() {
    let mut document = Document::new();
    list_card(&mut document, "list-default", None);
    let definition = document.definition("list-default").unwrap();
    assert_eq!(definition.renderer().instantiate().kind(), RendererKind::Immediate);
}

#[test]
fn immediate_replaces_content_and_style() {
    let mut document = Document::new();
    list_card(&mut document, "list-immediate", Some(RendererKind::Immediate));
    let el = document
        .build_element("list-immediate")
        .attribute("items", "a,b")
        .create()
        .unwrap();
    document.append(&el).unwrap();
    assert_eq!(el.inner_html(), format!("<ul><li>a</li><li>b</li></ul>{STYLE}"));

    el.set_attribute("items", "c").unwrap();
    assert_eq!(el.inner_html(), format!("<ul><li>c</li></ul>{STYLE}"));
    assert_eq!(el.shadow_root().len(), 2);
}

#[test]
fn diff_patch_keeps_the_materialized_tree() {
    let mut document = Document::new();
    list_card(&mut document, "list-diff", Some(RendererKind::DiffPatch));
    let el = document
        .build_element("list-diff")
        .attribute("items", "a,b,c")
        .create()
        .unwrap();
    document.append(&el).unwrap();
    assert_eq!(
        el.inner_html(),
        format!("<ul><li>a</li><li>b</li><li>c</li></ul>{STYLE}")
    );

    el.set_attribute("items", "a,x").unwrap();
    assert_eq!(el.inner_html(), format!("<ul><li>a</li><li>x</li></ul>{STYLE}"));
    assert_eq!(el.shadow_root().len(), 2);

    document.remove(&el).unwrap();
    assert_eq!(el.inner_html(), STYLE);

    document.append(&el).unwrap();
    assert_eq!(el.inner_html(), format!("<ul><li>a</li><li>x</li></ul>{STYLE}"));
}

#[test]
fn wrapped_component_mounts_and_unmounts() {
    let mut document = Document::new();
    list_card(&mut document, "list-wrapped", Some(RendererKind::WrappedComponent));
    let el = document.create_element("list-wrapped").unwrap();
    document.append(&el).unwrap();
    assert_eq!(el.inner_html(), format!("<ul></ul>{STYLE}"));

    el.set("items", PropValue::list([PropValue::from("z")])).unwrap();
    assert_eq!(el.inner_html(), format!("<ul><li>z</li></ul>{STYLE}"));

    document.remove(&el).unwrap();
    assert_eq!(el.inner_html(), STYLE);
}

#[test]
fn factory_default_applies_to_the_document() {
    let mut document = Document::with_factory(Factory::new().default_renderer(RendererKind::DiffPatch));
    list_card(&mut document, "list-configured", None);
    let definition = document.definition("list-configured").unwrap();
    assert_eq!(definition.renderer().instantiate().kind(), RendererKind::DiffPatch);
}

#[test]
fn markup_output_and_imported_styles() {
    let mut document = Document::new();
    document
        .define(
            ComponentDescription::new("markup-card")
                .attributes(attributes! { title: { type: String, default: "hi" } })
                .style(Style::Imports(vec![
                    String::from("a.css"),
                    String::from("b.css"),
                ]))
                .render(|_, props| {
                    let title = props.get("title").and_then(PropValue::as_text).unwrap_or("");
                    format!("<h1>{title}</h1>").into()
                }),
        )
        .unwrap();
    let el = document.create_element("markup-card").unwrap();
    document.append(&el).unwrap();

    assert_eq!(
        el.inner_html(),
        "<h1>hi</h1><style>@import \"a.css\"</style><style>@import \"b.css\"</style>"
    );
}

#[test]
fn no_style_injects_nothing() {
    let mut document = Document::new();
    document
        .define(ComponentDescription::new("plain-card").render(|_, _| "<p></p>".into()))
        .unwrap();
    let el = document.create_element("plain-card").unwrap();
    document.append(&el).unwrap();
    assert_eq!(el.inner_html(), "<p></p>");
}
