use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DataEnum, DataStruct, DeriveInput, Expr, Fields, Ident, Result, Type};

macro_rules! bail {
    ($msg:expr) => {
        return ::core::result::Result::Err(::syn::Error::new(
            ::proc_macro2::Span::call_site(),
            $msg,
        ))
    };
    ($span:expr, $msg:expr) => {
        return ::core::result::Result::Err(::syn::Error::new_spanned($span, $msg))
    };
}

#[proc_macro_derive(Register, attributes(register))]
pub fn register_derive(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input);

    // Build the trait implementation
    impl_register(&input).unwrap_or_else(|err| err.into_compile_error().into())
}

#[proc_macro_derive(FieldValue, attributes(field_value))]
pub fn field_value_derive(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input);

    impl_field_value(&input).unwrap_or_else(|err| err.into_compile_error().into())
}

fn impl_register(ast: &DeriveInput) -> Result<TokenStream> {
    let name = &ast.ident;

    if !ast.generics.params.is_empty() {
        bail!(&ast.generics, "Register derive does not support generics");
    }
    match ast.data {
        Data::Struct(DataStruct {
            fields: Fields::Unit,
            ..
        }) => {}
        _ => bail!(ast, "Register derive supports only unit structs"),
    }

    let RegisterAttrs {
        address,
        word,
        read_sync,
        write_sync,
        reserved,
        bus,
        flags,
        masks,
    } = parse_register_attrs(ast)?;

    let flags = flags.iter().map(|(name, value)| quote!(const #name: bool = #value;));
    // typed as the word so that literals like `!0x1` narrow to the register width
    let masks = masks.iter().map(|(name, value)| {
        quote!(
            const #name: u64 = {
                const MASK: #word = #value;
                MASK as u64
            };
        )
    });

    let all = quote!(
        unsafe impl ::reg_field::Register for #name {
            type Word = #word;
            const ADDRESS: usize = #address;
            type ReadSync = #read_sync;
            type WriteSync = #write_sync;
            type Reserved = #reserved;
            type Bus = #bus;
            #(#flags)*
            #(#masks)*
        }
    );
    Ok(all.into())
}

struct RegisterAttrs {
    address: Expr,
    word: proc_macro2::TokenStream,
    read_sync: proc_macro2::TokenStream,
    write_sync: proc_macro2::TokenStream,
    reserved: proc_macro2::TokenStream,
    bus: proc_macro2::TokenStream,
    flags: Vec<(Ident, Expr)>,
    masks: Vec<(Ident, Expr)>,
}

const FLAG_KEYS: [(&str, &str); 2] = [("readable", "READABLE"), ("writable", "WRITABLE")];

const MASK_KEYS: [(&str, &str); 4] = [
    ("read_and", "READ_AND"),
    ("read_or", "READ_OR"),
    ("write_and", "WRITE_AND"),
    ("write_or", "WRITE_OR"),
];

fn parse_register_attrs(ast: &DeriveInput) -> Result<RegisterAttrs> {
    let mut address = None::<Expr>;
    let mut word = None::<Type>;
    let mut read_sync = None::<Type>;
    let mut write_sync = None::<Type>;
    let mut reserved = None::<Type>;
    let mut bus = None::<Type>;
    let mut flags = Vec::<(Ident, Expr)>::new();
    let mut masks = Vec::<(Ident, Expr)>::new();

    for attr in &ast.attrs {
        if attr.path().is_ident("register") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("address") {
                    if address.is_some() {
                        return Err(meta.error("Register derive found a duplicate `address`"));
                    }
                    address = Some(meta.value()?.parse()?);
                    return Ok(());
                }
                for (keys, consts) in [(&FLAG_KEYS[..], &mut flags), (&MASK_KEYS[..], &mut masks)] {
                    if let Some((_, konst)) = keys.iter().find(|(key, _)| meta.path.is_ident(key)) {
                        if consts.iter().any(|(name, _)| name == konst) {
                            return Err(meta.error("Register derive found a duplicate key"));
                        }
                        let name = Ident::new(konst, proc_macro2::Span::call_site());
                        consts.push((name, meta.value()?.parse()?));
                        return Ok(());
                    }
                }
                let slot = if meta.path.is_ident("word") {
                    &mut word
                } else if meta.path.is_ident("read_sync") {
                    &mut read_sync
                } else if meta.path.is_ident("write_sync") {
                    &mut write_sync
                } else if meta.path.is_ident("reserved") {
                    &mut reserved
                } else if meta.path.is_ident("bus") {
                    &mut bus
                } else {
                    return Err(meta.error(
                        "Register derive found an unrecognized #[register(...)] key, expected one \
                         of `address`, `word`, `read_sync`, `write_sync`, `reserved`, `bus`, \
                         `readable`, `writable`, `read_and`, `read_or`, `write_and`, `write_or`",
                    ));
                };
                if slot.is_some() {
                    return Err(meta.error("Register derive found a duplicate key"));
                }
                *slot = Some(meta.value()?.parse()?);
                Ok(())
            })?;
        }
    }

    let Some(address) = address else {
        bail!("Register derive requires #[register(address = ...)]")
    };
    let word = match word {
        Some(ty) => {
            if !is_word(&ty) {
                bail!(
                    ty,
                    "Register derive supports only words of type u8, u16, u32 or u64"
                );
            }
            quote!(#ty)
        }
        None => quote!(u32),
    };
    let or_default = |ty: Option<Type>, default| match ty {
        Some(ty) => quote!(#ty),
        None => default,
    };
    Ok(RegisterAttrs {
        address,
        word,
        read_sync: or_default(read_sync, quote!(::reg_field::CpuSync)),
        write_sync: or_default(write_sync, quote!(::reg_field::CpuSync)),
        reserved: or_default(reserved, quote!(::reg_field::Nil)),
        bus: or_default(bus, quote!(::reg_field::Mmio)),
        flags,
        masks,
    })
}

fn is_word(ty: &Type) -> bool {
    let Type::Path(type_path) = ty else {
        return false;
    };
    let Some(ident) = type_path.path.get_ident() else {
        return false;
    };
    ident == "u8" || ident == "u16" || ident == "u32" || ident == "u64"
}

fn impl_field_value(ast: &DeriveInput) -> Result<TokenStream> {
    let name = &ast.ident;

    if !ast.generics.params.is_empty() {
        bail!(&ast.generics, "FieldValue derive does not support generics");
    }
    let Data::Enum(DataEnum { ref variants, .. }) = ast.data else {
        bail!(ast, "FieldValue derive supports only enums");
    };
    if variants.is_empty() {
        bail!(ast, "FieldValue derive requires at least one variant");
    }

    let mut names = Vec::<&Ident>::with_capacity(variants.len());
    let mut fallback = None::<&Ident>;
    for variant in variants {
        if !matches!(variant.fields, Fields::Unit) {
            bail!(variant, "FieldValue derive supports only fieldless variants");
        }
        for attr in &variant.attrs {
            if attr.path().is_ident("field_value") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("other") {
                        Ok(())
                    } else {
                        Err(meta.error("FieldValue derive expected #[field_value(other)]"))
                    }
                })?;
                if fallback.is_some() {
                    bail!(
                        attr,
                        "FieldValue derive allows only one #[field_value(other)] variant"
                    );
                }
                fallback = Some(&variant.ident);
            }
        }
        names.push(&variant.ident);
    }
    // unknown bit patterns decode to the first variant unless one is marked
    let fallback = fallback.unwrap_or(names[0]);
    let arms = names.iter().map(|variant| {
        quote!(
            if bits == #name::#variant as u64 {
                return #name::#variant;
            }
        )
    });

    let all = quote!(
        impl ::reg_field::FieldValue for #name {
            // a single variant enum is zero-sized but still takes one bit in a field
            const BITS: u32 = match ::core::mem::size_of::<Self>() {
                0 => 1,
                size => (size * 8) as u32,
            };

            #[inline]
            fn into_bits(self) -> u64 {
                self as u64
            }

            #[inline]
            fn from_bits(bits: u64) -> Self {
                #(#arms)*
                #name::#fallback
            }
        }
    );
    Ok(all.into())
}
