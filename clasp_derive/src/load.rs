use syn::spanned::Spanned;

pub(crate) struct RecordField {
    pub(crate) ident: syn::Ident,
    pub(crate) optional: bool,
    pub(crate) default: Option<syn::Expr>,
}

/// Extract the field list plus `#[clasp(..)]` attributes, in declaration
/// order.
pub(crate) fn load_fields(fields: &syn::FieldsNamed) -> Result<Vec<RecordField>, syn::Error> {
    let mut loaded = Vec::new();
    for field in &fields.named {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new(field.span(), "Record fields must be named"))?;
        let mut optional = false;
        let mut default = None;
        for attribute in &field.attrs {
            if !attribute.path().is_ident("clasp") {
                continue;
            }
            attribute.parse_nested_meta(|meta| {
                if meta.path.is_ident("optional") {
                    optional = true;
                    Ok(())
                } else if meta.path.is_ident("default") {
                    let expr: syn::Expr = meta.value()?.parse()?;
                    default = Some(expr);
                    Ok(())
                } else {
                    Err(meta.error("expected `optional` or `default = ..`"))
                }
            })?;
        }
        loaded.push(RecordField {
            ident,
            optional,
            default,
        });
    }
    Ok(loaded)
}
