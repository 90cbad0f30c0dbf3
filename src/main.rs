use mangle::{MangleError, Template, Value, mutate};
use mimalloc::MiMalloc;
use std::cell::Cell;
use std::rc::Rc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

struct Greeter<'a> {
    name: &'a str,
}

fn greeting(greeter: &Greeter<'_>) -> Template {
    Template::html(
        [
            "<div class=\"",
            " greeter\">\n        Hello <span>",
            "</span>\n    </div>",
        ],
        [Value::from(greeter.name), Value::from(greeter.name)],
    )
    .expect("greeting template has one more chunk than values")
}

fn greeting_list(names: &[&str]) -> Template {
    let haxor = "whatevs\" onload=\"javascript:alert(`pwnd`)";
    let salutes = ["Hi", "Kiora", "Gidday"]
        .into_iter()
        .map(|g| Template::html(["<b>", "</b>"], [Value::from(g)]).map(Value::from));
    let greeters = names
        .iter()
        .map(|&name| Value::from(greeting(&Greeter { name })));
    Template::html(
        [
            "<div ?hidden   = ",
            " .count=",
            " @click=",
            " data-haxor='",
            "'>\n        Hi All!\n\n        Greetings could be: ",
            "\n\n        <div class=\"greetings count-",
            "\">\n            ",
            "\n        </div>\n    </div>",
        ],
        [
            Value::from(names.is_empty()),
            Value::from(names.len()),
            Value::lazy(|| Value::Undefined),
            Value::from(haxor),
            salutes
                .collect::<Result<Vec<_>, _>>()
                .map(Value::from)
                .expect("salute template has one more chunk than values"),
            Value::from(names.len()),
            Value::list(greeters),
        ],
    )
    .expect("list template has one more chunk than values")
}

fn main() -> Result<(), MangleError> {
    let greeted = Rc::new(Cell::new(0));
    let counter = Rc::clone(&greeted);
    let footer = Template::html(
        ["\n        <footer>Greeted ", " people</footer>"],
        [Value::lazy(move || {
            counter.set(counter.get() + 1);
            Value::from(counter.get())
        })],
    )?;

    let mangled_greeting = mutate(greeting, &Greeter { name: "Jay" }, |_, root| {
        if let Some(span) = root.query_selector("span")? {
            span.append_child(" and me!");
            span.set_attribute("class", "foo");
            if let Some(parent) = span.parent_element() {
                parent.append_child(footer);
            }
        }
        Ok(())
    })?;
    println!("{}", mangled_greeting.render());

    let names = ["jay", "brian", "ola", "pete"];
    let mangled_list = mutate(|names: &[&str; 4]| greeting_list(names), &names, |_, root| {
        if let Some(outer) = root.query_selector("div")?
            && let Some(first) = outer.child_nodes().into_iter().next()
        {
            first.replace(Template::text("Greetings from The Mangler!!"));
        }
        let spans = root.query_selector_all("span")?;
        println!("{} greeted names", spans.len());
        Ok(())
    })?;
    println!("{}", mangled_list.render());
    println!("greeted {} people", greeted.get());
    Ok(())
}
