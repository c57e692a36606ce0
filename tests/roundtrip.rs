//! Round-trip tests: canonical text survives parse then write unchanged,
//! and any parseable text re-parses to the same structure once written.

mod common;

use common::{assert_text_roundtrip, roundtrip};

// -----------------------------------------------------------
// Canonical text is reproduced byte for byte.
// -----------------------------------------------------------

#[test]
fn roundtrip_simple_site() {
    roundtrip("example.com {\n\tlog\n}\n");
}

#[test]
fn roundtrip_multiple_addresses() {
    roundtrip("example.com www.example.com {\n\treverse_proxy localhost:8080\n}\n");
}

#[test]
fn roundtrip_multiple_directives() {
    roundtrip("example.com {\n\treverse_proxy app:3000\n\tencode gzip\n\tlog\n}\n");
}

#[test]
fn roundtrip_global_options_and_site() {
    roundtrip("{\n\temail admin@example.com\n}\n\nexample.com {\n\tlog\n}\n");
}

#[test]
fn roundtrip_nested_block() {
    roundtrip("example.com {\n\theader {\n\t\tX-Frame-Options DENY\n\t}\n}\n");
}

#[test]
fn roundtrip_quoted_argument() {
    roundtrip("example.com {\n\trespond \"Hello, world\" 200\n}\n");
}

#[test]
fn roundtrip_snippet_and_import() {
    roundtrip("(logging) {\n\tlog\n}\n\nexample.com {\n\timport logging\n}\n");
}

#[test]
fn roundtrip_matchers() {
    roundtrip(
        "example.com {\n\
         \t@api path /api/*\n\
         \treverse_proxy @api localhost:9000\n\
         \tfile_server\n\
         }\n",
    );
}

#[test]
fn roundtrip_deep_nesting() {
    roundtrip(
        "example.com {\n\
         \thandle /api/* {\n\
         \t\troute {\n\
         \t\t\treverse_proxy {\n\
         \t\t\t\tto app:3000\n\
         \t\t\t\thealth_uri /healthz\n\
         \t\t\t}\n\
         \t\t}\n\
         \t}\n\
         }\n",
    );
}

#[test]
fn roundtrip_placeholders() {
    roundtrip(
        "example.com {\n\
         \treverse_proxy app:3000 {\n\
         \t\theader_up X-Forwarded-Host {host}\n\
         \t}\n\
         \tredir https://www.{host}{uri}\n\
         }\n",
    );
}

#[test]
fn roundtrip_full_document() {
    roundtrip(
        "{\n\
         \temail ops@example.com\n\
         \tdebug\n\
         \torder rate_limit before basicauth\n\
         }\n\
         \n\
         (common) {\n\
         \tencode zstd gzip\n\
         }\n\
         \n\
         (site_log) {\n\
         \tlog {\n\
         \t\toutput file /var/log/caddy/access.log {\n\
         \t\t\troll_size 10mb\n\
         \t\t\troll_keep 5\n\
         \t\t}\n\
         \t\tformat json\n\
         \t}\n\
         }\n\
         \n\
         example.com {\n\
         \timport common\n\
         \timport site_log\n\
         \treverse_proxy localhost:8080\n\
         }\n\
         \n\
         :8080 {\n\
         \trespond \"not found\" 404\n\
         }\n",
    );
}

// -----------------------------------------------------------
// Non-canonical text re-parses to the same structure.
// -----------------------------------------------------------

#[test]
fn structural_roundtrip_space_indented() {
    assert_text_roundtrip(
        "example.com {\n    reverse_proxy localhost:8080\n    encode gzip\n}\n",
    );
}

#[test]
fn structural_roundtrip_comments_and_blank_lines() {
    assert_text_roundtrip(
        "# global\n{\n\n  admin off # no admin\n}\n\n\n# sites\nexample.com {\n  # proxy\n  reverse_proxy app:3000\n}\n",
    );
}

#[test]
fn structural_roundtrip_one_liners() {
    assert_text_roundtrip("(s) { log { format json } }\na.com { import s }\n");
}

#[test]
fn structural_roundtrip_comma_addresses() {
    assert_text_roundtrip("a.com, b.com,\nc.com {\n\tlog\n}\n");
}

#[test]
fn structural_roundtrip_awkward_arguments() {
    assert_text_roundtrip(
        "a.com {\n\trespond \"\" 204\n\trespond \"{\" 200\n\trespond \"#not a comment\"\n\theader X \"a \\\"b\\\" c\"\n\trespond \"ends with \\\\\"\n}\n",
    );
}

#[test]
fn structural_roundtrip_multiline_quoted() {
    assert_text_roundtrip("a.com {\n\trespond \"line one\nline two\" 200\n\tlog\n}\n");
}

#[test]
fn structural_roundtrip_ignored_content_stays_dropped() {
    assert_text_roundtrip("{\n\tdebug\n}\n{\n\tadmin off\n}\nhandle {\n\tlog\n}\nb.com {\n}\n");
}
