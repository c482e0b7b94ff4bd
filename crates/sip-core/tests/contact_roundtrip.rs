// Property tests: rendering a parsed Contact header and parsing it again
// yields the same model

use proptest::prelude::*;
use sigmedia_sip_core::types::contact::ContactHeader;

fn display_name() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        "[A-Za-z][A-Za-z0-9]{0,8}( [A-Za-z0-9]{1,6}){0,2}".prop_map(Some),
        r#"[A-Za-z ,;<>@:"\\]{0,12}"#.prop_map(|s| Some(format!("\"{}\"", escape(&s)))),
    ]
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn uri() -> impl Strategy<Value = String> {
    prop_oneof![
        "sips?:[a-z]{1,8}@[a-z]{1,8}\\.(com|org|net)",
        "sip:[a-z]{1,8}@[a-z]{1,8}\\.com;transport=(tcp|udp)",
        "sip:[a-z]{1,8}@\\[2001:db8::[1-9]\\]:50[0-9]{2}",
        "tel:\\+1-[0-9]{3}-[0-9]{4}",
    ]
}

fn param() -> impl Strategy<Value = String> {
    prop_oneof![
        "expires=[0-9]{1,9}",
        "q=(0\\.[0-9]{1,3}|1\\.0)",
        "x[a-z0-9-]{0,8}",
        "x[a-z0-9-]{0,8}=[A-Za-z0-9.-]{1,8}",
        r#"\+sip\.instance="<urn:uuid:[0-9a-f]{8}>""#,
        r#"[a-z]{1,6}="[A-Za-z ,;=]{0,10}""#,
    ]
}

fn entry() -> impl Strategy<Value = String> {
    (display_name(), uri(), prop::collection::vec(param(), 0..4)).prop_map(|(name, uri, params)| {
        let mut out = String::new();
        let bracket = name.is_some() || !params.is_empty() || uri.contains(';');
        if let Some(n) = name {
            out.push_str(&n);
            out.push(' ');
        }
        if bracket {
            out.push('<');
            out.push_str(&uri);
            out.push('>');
        } else {
            out.push_str(&uri);
        }
        for p in params {
            out.push(';');
            out.push_str(&p);
        }
        out
    })
}

fn header_text() -> impl Strategy<Value = String> {
    prop_oneof![
        1 => Just("*".to_string()),
        9 => prop::collection::vec(entry(), 1..4).prop_map(|entries| entries.join(" , ")),
    ]
}

proptest! {
    #[test]
    fn render_then_parse_is_identity(text in header_text()) {
        let parsed = ContactHeader::parse(&text).unwrap();
        let rendered = parsed.render();
        let reparsed = ContactHeader::parse(&rendered).unwrap();
        prop_assert_eq!(&parsed, &reparsed);
        prop_assert_eq!(rendered, reparsed.render());
    }

    #[test]
    fn parse_never_panics(text in "\\PC{0,64}") {
        let _ = ContactHeader::parse(&text);
    }
}
