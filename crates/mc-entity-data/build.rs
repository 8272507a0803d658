use std::{env, fs, path::PathBuf};

use heck::ToShoutySnakeCase;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use serde::Deserialize;

/// Wire id of kinds that never appear in packets.
const UNASSIGNED: i32 = -1;

/// One kind as written in `data/entities/<version>.json`
#[derive(Debug, Deserialize)]
struct KindInfo {
    name: String,
    #[serde(default)]
    id: Option<i32>,
    #[serde(default)]
    parent: Option<String>,
}

/// One version table
#[derive(Debug, Deserialize)]
struct EntityTable {
    name: String,
    protocol_version: i32,
    #[serde(default)]
    fallback: Option<String>,
    kinds: Vec<KindInfo>,
}

fn module_ident(version_name: &str) -> proc_macro2::Ident {
    format_ident!("v{}", version_name.replace(['.', '-'], "_"))
}

fn gen_kind(kind: &KindInfo) -> TokenStream {
    let name = kind.name.as_str();
    let id = kind.id.unwrap_or(UNASSIGNED);
    match &kind.parent {
        Some(parent) => quote! { KindDef::new(#name, #id, #parent) },
        None => quote! { KindDef::root(#name, #id) },
    }
}

fn gen_version_module(table: &EntityTable) -> TokenStream {
    let module = module_ident(&table.name);
    let protocol_version = table.protocol_version;
    let protocol_name = table.name.as_str();

    let kinds: Vec<TokenStream> = table.kinds.iter().map(gen_kind).collect();

    let fallback = match &table.fallback {
        Some(f) => quote! { Some(#f) },
        None => quote! { None },
    };

    let id_consts = table.kinds.iter().filter_map(|kind| {
        let id = kind.id?;
        let ident = format_ident!("{}", kind.name.to_shouty_snake_case());
        let doc = format!("`{}` wire id in {}", kind.name, table.name);
        Some(quote! {
            #[doc = #doc]
            pub const #ident: i32 = #id;
        })
    });

    let doc = format!("Entity kinds of Minecraft {protocol_name} (protocol {protocol_version})");
    let kind_count = table.kinds.len();

    quote! {
        #[doc = #doc]
        pub mod #module {
            use mc_entity_types::{KindDef, ProtocolVersion, VersionDefinition};

            /// Protocol version number
            pub const PROTOCOL_VERSION: ProtocolVersion = ProtocolVersion::new(#protocol_version);

            /// Game version name
            pub const PROTOCOL_NAME: &str = #protocol_name;

            /// Kind definitions in registration order
            pub const KINDS: &[KindDef; #kind_count] = &[#(#kinds,)*];

            pub const DEFINITION: VersionDefinition =
                VersionDefinition::from_static(PROTOCOL_VERSION, PROTOCOL_NAME, #fallback, KINDS);

            /// Wire ids of concrete kinds
            pub mod ids {
                #(#id_consts)*
            }
        }
    }
}

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let data_dir = manifest_dir.join("data").join("entities");

    println!("cargo:rerun-if-changed=data/entities");

    let mut tables: Vec<EntityTable> = fs::read_dir(&data_dir)
        .expect("failed to read data/entities")
        .map(|entry| entry.expect("failed to read directory entry").path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .map(|path| {
            println!("cargo:rerun-if-changed={}", path.display());
            let json = fs::read_to_string(&path).expect("failed to read entity table");
            serde_json::from_str(&json)
                .unwrap_or_else(|e| panic!("failed to parse {}: {e}", path.display()))
        })
        .collect();
    tables.sort_by_key(|t| t.protocol_version);

    let modules: Vec<TokenStream> = tables.iter().map(gen_version_module).collect();
    let definitions = tables.iter().map(|t| {
        let module = module_ident(&t.name);
        quote! { #module::DEFINITION }
    });
    let latest = module_ident(&tables.last().expect("no entity tables").name);

    let output = quote! {
        #(#modules)*

        /// Every built-in version, oldest first
        pub const DEFINITIONS: &[mc_entity_types::VersionDefinition] = &[#(#definitions,)*];

        /// Newest built-in version
        pub use self::#latest as latest;
    };

    let content =
        prettyplease::unparse(&syn::parse2(output).expect("failed to parse generated code"));
    fs::write(out_dir.join("entities.rs"), content).expect("failed to write entities.rs");
}
