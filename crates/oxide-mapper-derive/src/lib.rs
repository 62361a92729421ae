//! Derive macro for oxide-mapper entities.
//!
//! `#[derive(Entity)]` implements `oxide_mapper::Entity` for a struct with
//! named fields, declaring every field with its markers in declaration
//! order.

use convert_case::{Case, Casing};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::meta::ParseNestedMeta;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, LitBool, LitStr, Meta};

/// Derives `oxide_mapper::Entity` for a struct.
///
/// Field names are converted to PascalCase unless `rename_all` says
/// otherwise. Fields named `id` or `guid` become the key when no field is
/// marked explicitly.
///
/// # Struct Attributes
///
/// - `#[entity(alias = "Table")]` - Uses an explicit table name
/// - `#[entity(singular)]` - Uses the bare type name as table name
/// - `#[entity(rename_all = "snake_case")]` - Field naming: `PascalCase`
///   (default), `camelCase`, `snake_case` or `kebab-case`
///
/// # Field Attributes
///
/// - `#[field(key)]` - Marks the primary key (identity if numeric)
/// - `#[field(key, identity = false)]` - Key supplied by the caller
/// - `#[field(alias = "Column")]` - Maps the field to another column;
///   `alias = ""` marks it explicitly unaliased
/// - `#[field(nullable)]` - Marks a text or blob field nullable
/// - `#[field(ignore)]` - Hides the field from every statement
/// - `#[field(ignore = "writes")]` - Hides the field from one statement
///   kind: `select`, `insert`, `update`, `writes` or `all`
#[proc_macro_derive(Entity, attributes(entity, field))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_entity_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn derive_entity_impl(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let entity_attrs = parse_entity_attrs(&input.attrs)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Entity derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Entity derive only supports structs",
            ));
        }
    };

    let mut field_defs: Vec<TokenStream2> = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let ty = &field.ty;
        let attrs = parse_field_attrs(&field.attrs)?;

        let raw_name = ident.to_string();
        let raw_name = raw_name.strip_prefix("r#").unwrap_or(&raw_name);
        let name = entity_attrs.rename_all.apply(raw_name);

        let mut markers = TokenStream2::new();
        match attrs.key {
            Some(None) => markers.extend(quote! { .key() }),
            Some(Some(identity)) => markers.extend(quote! { .key_with_identity(#identity) }),
            None => {}
        }
        if let Some(alias) = &attrs.alias {
            markers.extend(quote! { .alias(#alias) });
        }
        if attrs.nullable {
            markers.extend(quote! { .nullable() });
        }
        if let Some(kind) = attrs.ignore {
            let variant = kind.variant();
            markers.extend(quote! { .ignore(::oxide_mapper::IgnoreKind::#variant) });
        }

        field_defs.push(quote! {
            ::oxide_mapper::FieldDef::<Self>::new::<#ty>(
                #name,
                |entity| &entity.#ident,
                |entity| &mut entity.#ident,
            )
            #markers
        });
    }

    let type_name = struct_name.to_string();
    let table_alias = match &entity_attrs.alias {
        Some(alias) => quote! { ::core::option::Option::Some(::std::string::String::from(#alias)) },
        None => quote! { ::core::option::Option::None },
    };
    let singular = entity_attrs.singular;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::oxide_mapper::Entity for #struct_name #ty_generics #where_clause {
            const TYPE_NAME: &'static str = #type_name;

            fn table_markers() -> ::oxide_mapper::TableMarkers {
                ::oxide_mapper::TableMarkers {
                    alias: #table_alias,
                    singular: #singular,
                }
            }

            fn fields() -> ::std::vec::Vec<::oxide_mapper::FieldDef<Self>> {
                ::std::vec![#(#field_defs),*]
            }
        }
    };

    Ok(expanded)
}

struct EntityAttrs {
    alias: Option<String>,
    singular: bool,
    rename_all: RenameRule,
}

#[derive(Clone, Copy)]
enum RenameRule {
    Pascal,
    Camel,
    Snake,
    Kebab,
}

impl RenameRule {
    fn parse(value: &LitStr) -> syn::Result<Self> {
        match value.value().as_str() {
            "PascalCase" => Ok(Self::Pascal),
            "camelCase" => Ok(Self::Camel),
            "snake_case" => Ok(Self::Snake),
            "kebab-case" => Ok(Self::Kebab),
            _ => Err(syn::Error::new_spanned(
                value,
                "expected one of: PascalCase, camelCase, snake_case, kebab-case",
            )),
        }
    }

    fn apply(self, name: &str) -> String {
        match self {
            Self::Pascal => name.to_case(Case::Pascal),
            Self::Camel => name.to_case(Case::Camel),
            Self::Snake => name.to_case(Case::Snake),
            Self::Kebab => name.to_case(Case::Kebab),
        }
    }
}

#[derive(Clone, Copy)]
enum IgnoreAttr {
    Select,
    Insert,
    Update,
    Writes,
    All,
}

impl IgnoreAttr {
    fn parse(value: &LitStr) -> syn::Result<Self> {
        match value.value().to_ascii_lowercase().as_str() {
            "select" => Ok(Self::Select),
            "insert" => Ok(Self::Insert),
            "update" => Ok(Self::Update),
            "writes" => Ok(Self::Writes),
            "all" => Ok(Self::All),
            _ => Err(syn::Error::new_spanned(
                value,
                "expected one of: select, insert, update, writes, all",
            )),
        }
    }

    fn variant(self) -> TokenStream2 {
        match self {
            Self::Select => quote! { Select },
            Self::Insert => quote! { Insert },
            Self::Update => quote! { Update },
            Self::Writes => quote! { Writes },
            Self::All => quote! { All },
        }
    }
}

#[derive(Default)]
struct FieldAttrs {
    /// `Some(None)`: key with default identity.
    key: Option<Option<bool>>,
    alias: Option<String>,
    nullable: bool,
    ignore: Option<IgnoreAttr>,
}

fn string_value(meta: &ParseNestedMeta) -> syn::Result<LitStr> {
    meta.value()?.parse()
}

fn parse_entity_attrs(attrs: &[Attribute]) -> syn::Result<EntityAttrs> {
    let mut result = EntityAttrs {
        alias: None,
        singular: false,
        rename_all: RenameRule::Pascal,
    };

    for attr in attrs {
        if !attr.path().is_ident("entity") || matches!(attr.meta, Meta::Path(_)) {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("alias") {
                result.alias = Some(string_value(&meta)?.value());
            } else if meta.path.is_ident("singular") {
                result.singular = true;
            } else if meta.path.is_ident("rename_all") {
                result.rename_all = RenameRule::parse(&string_value(&meta)?)?;
            } else {
                return Err(meta.error("unsupported entity attribute"));
            }
            Ok(())
        })?;
    }

    Ok(result)
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut result = FieldAttrs::default();
    let mut identity: Option<LitBool> = None;

    for attr in attrs {
        if !attr.path().is_ident("field") || matches!(attr.meta, Meta::Path(_)) {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("key") {
                result.key = Some(None);
            } else if meta.path.is_ident("identity") {
                identity = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("alias") {
                result.alias = Some(string_value(&meta)?.value());
            } else if meta.path.is_ident("nullable") {
                result.nullable = true;
            } else if meta.path.is_ident("ignore") {
                result.ignore = Some(if meta.input.peek(syn::Token![=]) {
                    IgnoreAttr::parse(&string_value(&meta)?)?
                } else {
                    IgnoreAttr::All
                });
            } else {
                return Err(meta.error("unsupported field attribute"));
            }
            Ok(())
        })?;
    }

    if let Some(identity) = identity {
        if result.key.is_none() {
            return Err(syn::Error::new_spanned(
                identity,
                "`identity` is only valid together with `key`",
            ));
        }
        result.key = Some(Some(identity.value));
    }

    Ok(result)
}
