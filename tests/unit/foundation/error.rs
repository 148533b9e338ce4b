use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        BackdropError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        BackdropError::decode("x")
            .to_string()
            .contains("decode error:")
    );
    assert!(
        BackdropError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        BackdropError::config("x")
            .to_string()
            .contains("config error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = BackdropError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
