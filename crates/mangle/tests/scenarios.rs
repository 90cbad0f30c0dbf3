use mangle::{DecodeError, MangleError, MutationSession, Template, Value, mutate};
use std::cell::Cell;
use std::rc::Rc;

fn html(strings: &[&str], values: Vec<Value>) -> Template {
    Template::html(strings.iter().copied(), values).expect("one more string than values")
}

fn noop(template: Template) -> Template {
    mutate(move |_: &()| template, &(), |_, _| Ok(())).expect("no-op mutation decodes")
}

fn first(root: &mangle::Element, selector: &str) -> mangle::Element {
    root.query_selector(selector)
        .unwrap_or_else(|err| panic!("selector {selector:?} rejected: {err}"))
        .unwrap_or_else(|| panic!("no match for {selector:?}"))
}

#[test]
fn noop_round_trip_preserves_render() {
    let item = |n: i32| html(&["<li data-n=\"", "\">", "</li>"], vec![n.into(), (n * 10).into()]);
    let source = html(
        &[
            "<section class=\"",
            "\"><h1>",
            "</h1><ul>",
            "</ul><p>",
            "</p><!-- note --></section>",
        ],
        vec![
            "wide card".into(),
            "Tom & Jerry <3".into(),
            Value::list([item(1).into(), item(2).into()]),
            Value::lazy(|| Value::from("lazy")),
        ],
    );
    let out = noop(source.clone());
    assert_eq!(out.render(), source.render());
    assert_eq!(
        out.render(),
        "<section class=\"wide card\"><h1>Tom &amp; Jerry &lt;3</h1>\
         <ul><li data-n=\"1\">10</li><li data-n=\"2\">20</li></ul>\
         <p>lazy</p><!-- note --></section>"
    );
}

#[test]
fn opaque_values_survive_by_identity() {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let handler = Value::lazy(move || {
        counter.set(counter.get() + 1);
        Value::Null
    });
    let nested = Rc::new(html(&["<em>", "</em>"], vec!["n".into()]));
    let rows = Value::list([]);
    let source = html(
        &["<button @click=", ">", "</button><div>", "</div><ol>", "</ol>"],
        vec![
            handler.clone(),
            Value::Null,
            Value::Template(Rc::clone(&nested)),
            rows.clone(),
        ],
    );
    let out = noop(source);
    assert_eq!(out.values().len(), 4);
    assert!(out.values()[0].same(&handler));
    assert!(matches!(out.values()[1], Value::Null));
    assert!(out.values()[3].same(&rows));
    // Nested templates come back as an equivalent template, rebuilt from markup.
    let rebuilt = out.values()[2].as_template().expect("nested template");
    assert_eq!(rebuilt.render(), nested.render());
    assert_eq!(calls.get(), 0, "functions are never called while mangling");
}

#[test]
fn array_of_templates_keeps_length_and_order() {
    let items: Vec<Value> = (0..5)
        .map(|i| html(&["<li>", "</li>"], vec![format!("item {i}").into()]).into())
        .collect();
    let source = html(&["<ul>", "</ul>"], vec![Value::list(items)]);
    let out = noop(source);
    let list = out.values()[0].as_list().expect("list value");
    assert_eq!(list.len(), 5);
    for (i, item) in list.iter().enumerate() {
        assert_eq!(item.render(), format!("<li>item {i}</li>"));
    }
}

#[test]
fn shared_reference_is_encoded_once() {
    let shared = Value::from(html(&["<b>", "</b>"], vec!["s".into()]));
    let source = html(&["<p>", "</p><p>", "</p>"], vec![shared.clone(), shared]);
    let session = MutationSession::new(&source, &Default::default());
    // Outer template value plus its inner scalar.
    assert_eq!(session.value_count(), 2);
    let flattened = session.to_html();
    assert_eq!(flattened.matches("#$$lit_mangler_0$$").count(), 2);
    let out = session.finish().expect("decodes");
    assert_eq!(out.render(), "<p><b>s</b></p><p><b>s</b></p>");
}

#[test]
fn end_to_end_text_replacement() {
    let source = html(&["<div><span>", "</span></div>"], vec!["World".into()]);
    let out = mutate(
        |_: &()| source.clone(),
        &(),
        |_, root| {
            first(root, "span").set_text_content("Earth");
            Ok(())
        },
    )
    .expect("mutation succeeds");
    assert_eq!(out.render(), "<div><span>Earth</span></div>");
    assert_eq!(out.strings(), ["<div><span>", "</span></div>"]);
    assert_eq!(out.values()[0].as_str(), Some("Earth"));
    assert!(out.values().iter().all(|v| v.as_str() != Some("World")));
    // The source template is untouched.
    assert_eq!(source.render(), "<div><span>World</span></div>");
}

#[test]
fn nested_template_append_stays_structured() {
    let footer = html(&["<footer>count ", "</footer>"], vec![1.into()]);
    let source = html(&["<main>", "</main>"], vec![Template::text("<b>x</b>").into()]);
    let out = mutate(
        |_: &()| source,
        &(),
        |_, root| {
            first(root, "main").append_child(footer.clone());
            Ok(())
        },
    )
    .expect("mutation succeeds");
    assert_eq!(out.render(), "<main><b>x</b><footer>count 1</footer></main>");
    let appended = out
        .values()
        .iter()
        .filter_map(Value::as_template)
        .find(|t| t.render() == "<footer>count 1</footer>")
        .expect("appended template is a nested value");
    assert_eq!(appended.strings(), ["<footer>count ", "</footer>"]);
}

#[test]
fn class_list_scenario() {
    let source = Template::text("<div class=\"a b\"></div>");
    let out = mutate(
        |_: &()| source,
        &(),
        |_, root| {
            let div = first(root, "div");
            div.class_list().remove(["a"]);
            assert_eq!(div.get_attribute("class").as_deref(), Some("b"));

            div.class_list().add(["c"]);
            let class = div.get_attribute("class").unwrap_or_default();
            assert!(class.starts_with("b $$lit_mangler_"), "c is bound, not literal: {class}");
            assert!(!class.split(' ').any(|t| t == "c"));

            assert!(!div.class_list().toggle("b"));
            assert_eq!(div.class_list().tokens().len(), 1);
            assert!(div.class_list().contains("c"));
            Ok(())
        },
    )
    .expect("mutation succeeds");
    assert_eq!(out.render(), "<div class=\"c\"></div>");
    assert_eq!(out.values().len(), 1);
    assert_eq!(out.values()[0].as_str(), Some("c"));
}

#[test]
fn removing_a_node_drops_its_values() {
    let source = html(
        &["<p>", "</p><aside>", "</aside>"],
        vec!["keep".into(), Value::lazy(|| Value::Null)],
    );
    let out = mutate(
        |_: &()| source,
        &(),
        |_, root| {
            first(root, "aside").remove();
            Ok(())
        },
    )
    .expect("mutation succeeds");
    assert_eq!(out.render(), "<p>keep</p>");
    assert_eq!(out.values().len(), 1);
}

#[test]
fn mutator_damage_to_placeholders_aborts() {
    let source = html(&["<p>", "</p>"], vec!["x".into()]);
    let err = mutate(
        |_: &()| source,
        &(),
        |_, root| {
            // Injects an open token for an unregistered index with no close token.
            first(root, "p").set_text_content("ignored");
            root.append_child(Template::text("#$$lit_mangler_9$$"));
            Ok(())
        },
    )
    .expect_err("unterminated pair");
    assert_eq!(err, MangleError::Decode(DecodeError::Unterminated { id: 9 }));
}

#[test]
fn literal_slash_before_an_opaque_value_round_trips() {
    let image = Value::lazy(|| Value::from("cat.png"));
    let source = html(&["<img src=\"/img/", "\">"], vec![image.clone()]);
    let out = noop(source.clone());
    assert_eq!(out.strings(), source.strings());
    assert!(out.values()[0].same(&image));
    assert_eq!(out.render(), "<img src=\"/img/cat.png\">");
}

#[test]
fn literal_hash_before_an_opaque_value_round_trips() {
    let source = html(&["<a href=\"#", "\">x</a>"], vec![Value::Null]);
    let out = noop(source.clone());
    assert_eq!(out.strings(), source.strings());
    assert!(matches!(out.values()[0], Value::Null));
}

#[test]
fn literal_hash_before_an_inserted_value_round_trips() {
    let source = Template::text("<p>#</p>");
    let out = mutate(
        |_: &()| source,
        &(),
        |_, root| {
            let p = first(root, "p");
            let hash = p.child_nodes().into_iter().next().expect("text node");
            hash.insert_after(Value::from("top"));
            Ok(())
        },
    )
    .expect("mutation succeeds");
    assert_eq!(out.strings(), ["<p>#", "</p>"]);
    assert_eq!(out.render(), "<p>#top</p>");
}
