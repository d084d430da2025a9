//! In-memory sample documents for tests.

use lopdf::{dictionary, Document, EncryptionState, EncryptionVersion, Object, Permissions, Stream};

fn build_document(text: &str) -> Document {
    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica"
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => Object::Reference(font_id)
        }
    });
    let content = format!("BT\n/F1 12 Tf\n100 700 Td\n({}) Tj\nET\n", text);
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => Object::Reference(pages_id),
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(612),
            Object::Integer(792)
        ],
        "Resources" => Object::Reference(resources_id),
        "Contents" => Object::Reference(content_id)
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id)
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc
}

fn to_bytes(doc: &mut Document) -> Vec<u8> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// A one-page unencrypted PDF showing `text`. No trailer `/ID`.
pub fn sample_pdf(text: &str) -> Vec<u8> {
    to_bytes(&mut build_document(text))
}

/// A one-page PDF already protected with `password`.
pub fn locked_pdf(password: &str) -> Vec<u8> {
    let mut doc = build_document("locked");
    doc.trailer.set(
        "ID",
        Object::Array(vec![
            Object::String(vec![7u8; 16], lopdf::StringFormat::Literal),
            Object::String(vec![9u8; 16], lopdf::StringFormat::Literal),
        ]),
    );
    let version = EncryptionVersion::V2 {
        document: &doc,
        owner_password: password,
        user_password: password,
        key_length: 128,
        permissions: Permissions::all()
    };
    let state = EncryptionState::try_from(version).unwrap();
    doc.encrypt(&state).unwrap();
    to_bytes(&mut doc)
}
