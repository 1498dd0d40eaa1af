//! Human-readable rendering of types, subjects and binding maps.
//!
//! Used for error messages and trace output:
//!
//! ```text
//! Pair[Int, Str]
//! List[T] | Dict[K, Set[V]]
//! {A: Int, B: Str, #1: Bytes}
//! ```

use crate::binding::{BindingKey, TypeBindings};
use crate::db::TypeDatabase;
use crate::def::DefId;
use crate::hierarchy::Subject;
use crate::types::{TypeData, TypeId, TypeParamInfo};
use std::fmt::Write;

pub struct TypeFormatter<'a> {
    db: &'a dyn TypeDatabase,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        Self { db }
    }

    pub fn format(&self, ty: TypeId) -> String {
        let mut out = String::new();
        self.write_type(&mut out, ty);
        out
    }

    fn write_type(&self, out: &mut String, ty: TypeId) {
        let Some(data) = self.db.lookup(ty) else {
            let _ = write!(out, "<unknown #{}>", ty.0);
            return;
        };
        match data {
            TypeData::Class(def_id) => out.push_str(&self.format_def(def_id)),
            TypeData::TypeParameter(param) => out.push_str(&self.format_param(&param)),
            TypeData::Application(app_id) => {
                let Some(app) = self.db.type_application(app_id) else {
                    let _ = write!(out, "<unknown #{}>", ty.0);
                    return;
                };
                out.push_str(&self.format_def(app.base));
                out.push('[');
                for (i, &arg) in app.args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_type(out, arg);
                }
                out.push(']');
            }
            TypeData::Union(list_id) => {
                let members = self.db.type_list(list_id);
                if members.is_empty() {
                    out.push_str("Never");
                    return;
                }
                for (i, &member) in members.iter().enumerate() {
                    if i > 0 {
                        out.push_str(" | ");
                    }
                    self.write_type(out, member);
                }
            }
        }
    }

    pub fn format_def(&self, def_id: DefId) -> String {
        match self.db.definition(def_id) {
            Some(info) => self.db.resolve_atom_ref(info.name).to_string(),
            None => format!("<def #{}>", def_id.0),
        }
    }

    pub fn format_param(&self, param: &TypeParamInfo) -> String {
        self.db.resolve_atom_ref(param.name).to_string()
    }

    /// `T` for a parameter key, `#i` for a positional one.
    pub fn format_key(&self, key: &BindingKey) -> String {
        match key {
            BindingKey::Param(param) => self.format_param(param),
            BindingKey::Index(index) => format!("#{index}"),
        }
    }

    pub fn format_subject(&self, subject: &Subject) -> String {
        match subject {
            Subject::Type(ty) => self.format(*ty),
            Subject::Instance(instance) => match instance.orig_class {
                Some(orig) => format!("instance of {}", self.format(orig)),
                None => format!("instance of {}", self.format_def(instance.class)),
            },
        }
    }

    pub fn format_bindings(&self, bindings: &TypeBindings) -> String {
        let mut out = String::from("{");
        for (i, (key, &ty)) in bindings.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&self.format_key(key));
            out.push_str(": ");
            self.write_type(&mut out, ty);
        }
        out.push('}');
        out
    }
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
