use insta::assert_snapshot;
use snipctx::app::render::ResponseRenderer;
use snipctx::infra::highlight::Palette;

#[test]
fn mixed_response_renders() {
    let raw = "### Plan\nUse **bold** here & there.\n```java\nint x = 1; // one\n```\nDone.";
    let rendered = ResponseRenderer::new(Palette::default())
        .expect("renderer")
        .render(raw);
    assert_snapshot!("mixed_response", rendered);
}
