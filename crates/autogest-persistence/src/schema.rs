//! Esquema Diesel (escrito a mano). Reemplazable con `diesel print-schema`.

diesel::table! {
    requests (id) {
        id -> BigInt,
        citizen_id -> Text,
        document_type -> Text,
        priority -> Text,
        created_at -> Text,
        contact_email -> Nullable<Text>,
    }
}
