use pretty_assertions::assert_eq;
use unifont_glyph::{CodecError, FontError, GlyphCodec, GlyphFile, NameRegistry};

const FONT: &str = "\
0041:0000000018242442427E424242420000; name=\"LATIN CAPITAL LETTER A\"

0020:; np
; Missing >0005:;np name=\"space\"
";

#[test]
fn test_parse_file() {
    let registry = NameRegistry::new();
    let codec = GlyphCodec::new(&registry);
    let file = GlyphFile::parse(codec, FONT).unwrap();
    assert_eq!(file.len(), 3);
    assert_eq!(file.get(0x41).unwrap().name(), Some("LATIN CAPITAL LETTER A"));
    assert!(file.get(0x20).unwrap().is_non_printing());
    assert!(file.get(0x5).unwrap().missing);
    assert!(file.get(0x42).is_none());

    let codepoints: Vec<u32> = file.iter().map(|glyph| glyph.codepoint()).collect();
    assert_eq!(codepoints, vec![0x5, 0x20, 0x41]);
}

#[test]
fn test_to_text_is_canonical() {
    let registry = NameRegistry::new();
    let codec = GlyphCodec::new(&registry);
    let file = GlyphFile::parse(codec, FONT).unwrap();
    assert_eq!(
        file.to_text(codec).unwrap(),
        "\
; Missing >5:00000000000000000000000000000000; np name=\"space\"
20:00000000000000000000000000000000; np
41:0000000018242442427E424242420000; name=\"LATIN CAPITAL LETTER A\"
"
    );
    assert_eq!(GlyphFile::parse(codec, &file.to_text(codec).unwrap()).unwrap(), file);
}

#[test]
fn test_parse_reports_line_number() {
    let registry = NameRegistry::new();
    let codec = GlyphCodec::new(&registry);
    let text = "41:;\n\n42:XY00;\n43:;\n";
    match GlyphFile::parse(codec, text) {
        Err(FontError::InvalidLine { line_number, source }) => {
            assert_eq!(line_number, 3);
            assert_eq!(source.line(), Some("42:XY00;"));
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn test_duplicate_codepoint() {
    let registry = NameRegistry::new();
    let codec = GlyphCodec::new(&registry);
    let result = GlyphFile::parse(codec, "41:;\n0041:; np\n");
    assert!(matches!(
        result,
        Err(FontError::DuplicateCodepoint {
            line_number: 2,
            codepoint: 0x41
        })
    ));
}

#[test]
fn test_parse_lenient() {
    let registry = NameRegistry::new();
    let codec = GlyphCodec::new(&registry);
    let (file, errors) = GlyphFile::parse_lenient(codec, "41:;\nbroken\n42:FFF;\n43:;\n41:;\n");
    assert_eq!(file.len(), 2);
    assert_eq!(errors.len(), 3);
    assert!(matches!(errors[0], FontError::InvalidLine { line_number: 2, .. }));
    assert!(matches!(errors[1], FontError::InvalidLine { line_number: 3, .. }));
    assert!(matches!(errors[2], FontError::DuplicateCodepoint { line_number: 5, .. }));
}

#[test]
fn test_editing() {
    let registry = NameRegistry::new();
    let codec = GlyphCodec::new(&registry);
    let mut file = GlyphFile::parse(codec, FONT).unwrap();

    let glyph = file.get_or_insert(0x42).unwrap();
    assert_eq!(glyph.width(), 8);
    glyph.set_pixel(1, 1, true).unwrap();
    assert!(file.get(0x42).unwrap().get_pixel(1, 1).unwrap());
    assert!(file.get_or_insert(0x11_0000).is_err());

    file.get_mut(0x41).unwrap().missing = true;
    assert!(file.get(0x41).unwrap().missing);

    assert_eq!(file.next_after(0x20).map(|g| g.codepoint()), Some(0x41));
    assert_eq!(file.next_after(0x42).map(|g| g.codepoint()), None);
    assert_eq!(file.previous_before(0x41).map(|g| g.codepoint()), Some(0x20));
    assert_eq!(file.previous_before(0x5).map(|g| g.codepoint()), None);

    assert!(file.remove(0x20).is_some());
    assert_eq!(file.next_after(0x5).map(|g| g.codepoint()), Some(0x41));
}

#[test]
fn test_read_write() {
    let registry = NameRegistry::new();
    let codec = GlyphCodec::new(&registry);
    let file = GlyphFile::parse(codec, FONT).unwrap();

    let path = std::env::temp_dir().join(format!("unifont_glyph_test_{}.hex", std::process::id()));
    file.write(codec, &path).unwrap();
    let read = GlyphFile::read(codec, &path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(read, file);
}

#[test]
fn test_write_refuses_unwritable_glyph() {
    let registry = NameRegistry::new();
    let codec = GlyphCodec::new(&registry);
    let mut file = GlyphFile::parse(codec, FONT).unwrap();
    let glyph = file.get_mut(0x41).unwrap();
    glyph.set_attribute(registry.attribute("note"), "ends with \\");

    let path = std::env::temp_dir().join(format!("unifont_glyph_unwritable_{}.hex", std::process::id()));
    let result = file.write(codec, &path);
    assert!(matches!(
        result,
        Err(FontError::UnwritableGlyph(CodecError::UnwritableValue { codepoint: 0x41, .. }))
    ));
    assert!(!path.exists());
}
