//! Dependency resolution and head output inside rendered documents.

use facet_testhelpers::test;
use potluck::{Child, Dependency, DependencySource, Document, Element, Fragment, Version};

fn dep(name: &str, version: &str, src: &str) -> Dependency {
    Dependency::new(name, version)
        .unwrap()
        .with_source(DependencySource::local("foo"))
        .with_script([("src", src)])
        .unwrap()
}

fn page(head: &[&str], body: &str) -> String {
    let mut out =
        String::from("<!DOCTYPE html>\n<html>\n  <head>\n    <meta charset=\"utf-8\"/>\n");
    for line in head {
        out.push_str("    ");
        out.push_str(line);
        out.push('\n');
    }
    out.push_str("  </head>\n");
    out.push_str(body);
    out.push_str("\n</html>");
    out
}

#[test]
fn highest_version_wins() {
    let test = Fragment::from_child(vec![
        dep("a", "1.1", "a1.js"),
        dep("b", "1.9", "b1.js"),
        dep("b", "1.10", "b2.js"),
        dep("a", "1.2", "a2.js"),
        dep("a", "1.2.1", "a3.js"),
        dep("b", "1.9", "b1.js"),
        dep("b", "1.10", "b2.js"),
        dep("c", "1.0", "c1.js"),
    ]);

    assert_eq!(
        Document::new(&test).render(None).unwrap().html,
        page(
            &[
                "<script src=\"a-1.2.1/a3.js\"></script>",
                "<script src=\"b-1.10/b2.js\"></script>",
                "<script src=\"c-1.0/c1.js\"></script>",
            ],
            "  <body></body>"
        )
    );
    assert_eq!(
        Document::new(&test).render(Some("libfoo")).unwrap().html,
        page(
            &[
                "<script src=\"libfoo/a-1.2.1/a3.js\"></script>",
                "<script src=\"libfoo/b-1.10/b2.js\"></script>",
                "<script src=\"libfoo/c-1.0/c1.js\"></script>",
            ],
            "  <body></body>"
        )
    );
}

#[test]
fn inline_dependencies() {
    let a1_1 = || dep("a", "1.1", "a1.js");
    let a1_2 = || dep("a", "1.2", "a2.js");
    let div_foo = || Element::new("div").with_child("foo");

    let flat_body = "  <body>\n    <div>foo</div>\n    bar\n  </body>";
    let nested_body = "  <body>\n    <div>\n      <div>foo</div>\n      bar\n    </div>\n  </body>";
    let a1 = "<script src=\"a-1.1/a1.js\"></script>";
    let a2 = "<script src=\"a-1.2/a2.js\"></script>";

    let cases: Vec<(Child, &str, &str)> = vec![
        (
            Child::from(vec![Child::from(a1_1()), Child::from(div_foo()), Child::from("bar")]),
            a1,
            flat_body,
        ),
        (
            Child::from(vec![
                Child::from(a1_1()),
                Child::from(div_foo()),
                Child::from(a1_2()),
                Child::from("bar"),
            ]),
            a2,
            flat_body,
        ),
        (
            Child::from(
                Element::new("div")
                    .with_child(a1_1())
                    .with_child(div_foo())
                    .with_child("bar"),
            ),
            a1,
            nested_body,
        ),
        (
            Child::from(vec![
                Child::from(vec![Child::from(a1_1()), Child::from(div_foo())]),
                Child::from("bar"),
            ]),
            a1,
            flat_body,
        ),
        (
            Child::from(
                Element::new("div")
                    .with_child(vec![Child::from(a1_1()), Child::from(div_foo())])
                    .with_child("bar"),
            ),
            a1,
            nested_body,
        ),
    ];

    for (content, script, body) in cases {
        assert_eq!(
            Document::new(content).render(None).unwrap().html,
            page(&[script], body)
        );
    }
}

#[test]
fn appended_dependencies() {
    let a1_1 = || dep("a", "1.1", "a1.js");
    let a1_2 = || dep("a", "1.2", "a2.js");
    let b1_0 = || dep("b", "1.0", "b1.js");

    let mut x = Element::new("div").with_child(a1_1()).with_child(b1_0());
    x.append(a1_2());
    let mut y = Element::new("div").with_child(a1_1());
    y.append(vec![a1_2(), b1_0()]);
    let mut z = Element::new("div");
    z.append(vec![a1_1(), b1_0()]);
    z.append(a1_2());

    let expected = page(
        &[
            "<script src=\"a-1.2/a2.js\"></script>",
            "<script src=\"b-1.0/b1.js\"></script>",
        ],
        "  <body>\n    <div></div>\n  </body>",
    );
    for element in [x, y, z] {
        assert_eq!(Document::new(element).render(None).unwrap().html, expected);
    }
}

#[test]
fn script_and_stylesheet_paths_are_encoded() {
    let fake_dep = || {
        Dependency::new("a", "1.0")
            .unwrap()
            .with_source(DependencySource::local("srcpath"))
            .with_script([("src", "js/foo bar.js")])
            .unwrap()
            .with_stylesheet([("href", "css/bar foo.css")])
            .unwrap()
    };
    let dep1 = fake_dep();
    let dep2 = fake_dep();
    assert_eq!(dep1, dep2);

    let test = Fragment::from_child(vec![dep1, dep2]);
    for _ in 0..2 {
        assert_eq!(
            Document::new(&test).render(None).unwrap().html,
            page(
                &[
                    "<link href=\"a-1.0/css/bar%20foo.css\" rel=\"stylesheet\"/>",
                    "<script src=\"a-1.0/js/foo%20bar.js\"></script>",
                ],
                "  <body></body>"
            )
        );
    }
}

#[test]
fn meta_tags_are_hoisted() {
    let a = dep("a", "1.0", "a1.js").with_meta([
        ("name", "viewport"),
        ("content", "width=device-width, initial-scale=1"),
    ]);
    let b = Dependency::new("b", "2.0")
        .unwrap()
        .with_source(DependencySource::local("foo"))
        .with_meta([("name", "x"), ("content", "x-value")])
        .with_meta([("name", "y"), ("content", "y-value")]);

    let combined = Document::new(vec![a, b]).render(None).unwrap().html;
    assert!(combined.contains(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"/>"
    ));
    assert!(combined.contains("<meta name=\"x\" content=\"x-value\"/>"));
    assert!(combined.contains("<meta name=\"y\" content=\"y-value\"/>"));
}

#[test]
fn rendered_dependencies_are_resolved() {
    let rendered = Element::new("div")
        .with_child(dep("a", "1.1", "a1.js"))
        .with_child(Element::new("p").with_child(dep("a", "1.10", "a2.js")))
        .render()
        .unwrap();
    assert_eq!(rendered.html, "<div>\n  <p></p>\n</div>");
    assert_eq!(rendered.dependencies.len(), 1);
    assert_eq!(
        rendered.dependencies[0].version,
        Version::parse("1.10").unwrap()
    );
}
