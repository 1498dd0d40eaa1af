//! Class declaration.
//!
//! `ClassBuilder` registers a class the way a host language declares one:
//! a name, immediate bases written as type expressions, and optionally an
//! explicit declared parameter list. Bases may only name classes that are
//! already registered, so the ancestry graph is acyclic by construction.
//!
//! The declared parameter list is, in order of precedence:
//! 1. the explicit list passed to `type_params`,
//! 2. the arguments of the `Generic[...]` base,
//! 3. every free type parameter of the bases, in order of first appearance.

use crate::db::TypeEnvironment;
use crate::def::{DefId, DefKind, DefinitionInfo, FieldInfo};
use crate::diagnostics::DeclarationError;
use crate::types::{TypeData, TypeId, TypeParamInfo};
use tracing::debug;

/// Builder for class and record definitions.
pub struct ClassBuilder<'a> {
    env: &'a TypeEnvironment,
    name: String,
    is_record: bool,
    bases: Vec<TypeId>,
    explicit_params: Option<Vec<TypeParamInfo>>,
    fields: Vec<(String, TypeId)>,
}

impl<'a> ClassBuilder<'a> {
    pub fn new(env: &'a TypeEnvironment, name: &str) -> Self {
        Self {
            env,
            name: name.to_string(),
            is_record: false,
            bases: Vec::new(),
            explicit_params: None,
            fields: Vec::new(),
        }
    }

    /// Declare a structured record instead of an ordinary class.
    pub fn record(mut self) -> Self {
        self.is_record = true;
        self
    }

    /// Add an immediate base.
    pub fn extends(mut self, base: TypeId) -> Self {
        self.bases.push(base);
        self
    }

    /// Add a `Generic[params...]` base.
    pub fn generic(mut self, params: &[TypeParamInfo]) -> Self {
        self.bases.push(self.env.generic(params));
        self
    }

    /// Declare the parameter list explicitly.
    pub fn type_params(mut self, params: Vec<TypeParamInfo>) -> Self {
        self.explicit_params = Some(params);
        self
    }

    /// Add a record field. Fields that mention the record itself are
    /// attached after `build` via `TypeEnvironment::set_fields`.
    pub fn field(mut self, name: &str, ty: TypeId) -> Self {
        self.fields.push((name.to_string(), ty));
        self
    }

    pub fn build(self) -> Result<DefId, DeclarationError> {
        let mut marker_params: Option<Vec<TypeParamInfo>> = None;
        for &base in &self.bases {
            if let Some(params) = self.check_base(base)? {
                if marker_params.is_some() {
                    return Err(DeclarationError::DuplicateMarker {
                        class: self.name.clone(),
                    });
                }
                marker_params = Some(params);
            }
        }

        let mut free = Vec::new();
        for &base in &self.bases {
            self.collect_type_params(base, &mut free);
        }

        let type_params = match self.explicit_params.clone().or(marker_params) {
            Some(declared) => {
                self.check_unique(&declared)?;
                if let Some(missing) = free.iter().find(|p| !declared.contains(p)) {
                    return Err(DeclarationError::UndeclaredParameter {
                        class: self.name.clone(),
                        parameter: self.env.formatter().format_param(missing),
                    });
                }
                declared
            }
            None => free,
        };

        let interner = self.env.interner();
        let name = interner.intern_string(&self.name);
        let info = if self.is_record {
            let fields = self
                .fields
                .iter()
                .map(|(field, type_id)| FieldInfo {
                    name: interner.intern_string(field),
                    type_id: *type_id,
                })
                .collect();
            DefinitionInfo::record(name, type_params, self.bases, fields)
        } else {
            DefinitionInfo::class(name, type_params, self.bases)
        };

        debug!(
            class = %self.name,
            params = info.type_params.len(),
            bases = info.bases.len(),
            record = self.is_record,
            "ClassBuilder::build"
        );
        Ok(self.env.definitions().register(info))
    }

    /// Validate one base. Returns the marker's parameters when the base is
    /// `Generic[...]`.
    fn check_base(&self, base: TypeId) -> Result<Option<Vec<TypeParamInfo>>, DeclarationError> {
        let fmt = self.env.formatter();
        let invalid = || DeclarationError::InvalidBase {
            class: self.name.clone(),
            base: fmt.format(base),
        };
        let unknown = || DeclarationError::UnknownBase {
            class: self.name.clone(),
            base: fmt.format(base),
        };
        let definitions = self.env.definitions();
        let interner = self.env.interner();

        match interner.lookup(base).ok_or_else(invalid)? {
            TypeData::Class(def_id) => match definitions.get_kind(def_id) {
                None => Err(unknown()),
                // A bare `Generic` declares nothing.
                Some(DefKind::GenericMarker) => Err(invalid()),
                Some(_) => Ok(None),
            },
            TypeData::Application(app_id) => {
                let app = interner.type_application(app_id).ok_or_else(invalid)?;
                match definitions.get_kind(app.base) {
                    None => Err(unknown()),
                    Some(DefKind::GenericMarker) => {
                        let mut params = Vec::with_capacity(app.args.len());
                        for &arg in &app.args {
                            match interner.lookup(arg) {
                                Some(TypeData::TypeParameter(param)) => params.push(param),
                                _ => {
                                    return Err(DeclarationError::NonParameterMarkerArgument {
                                        class: self.name.clone(),
                                        argument: fmt.format(arg),
                                    });
                                }
                            }
                        }
                        Ok(Some(params))
                    }
                    Some(_) => Ok(None),
                }
            }
            TypeData::TypeParameter(_) | TypeData::Union(_) => Err(invalid()),
        }
    }

    fn check_unique(&self, params: &[TypeParamInfo]) -> Result<(), DeclarationError> {
        for (i, param) in params.iter().enumerate() {
            if params[..i].contains(param) {
                return Err(DeclarationError::DuplicateParameter {
                    class: self.name.clone(),
                    parameter: self.env.formatter().format_param(param),
                });
            }
        }
        Ok(())
    }

    /// Free type parameters of `ty`, appended in order of first appearance.
    fn collect_type_params(&self, ty: TypeId, out: &mut Vec<TypeParamInfo>) {
        let interner = self.env.interner();
        match interner.lookup(ty) {
            Some(TypeData::TypeParameter(param)) => {
                if !out.contains(&param) {
                    out.push(param);
                }
            }
            Some(TypeData::Application(app_id)) => {
                if let Some(app) = interner.type_application(app_id) {
                    for &arg in &app.args {
                        self.collect_type_params(arg, out);
                    }
                }
            }
            Some(TypeData::Union(list_id)) => {
                for &member in interner.type_list(list_id).iter() {
                    self.collect_type_params(member, out);
                }
            }
            Some(TypeData::Class(_)) | None => {}
        }
    }
}

#[cfg(test)]
#[path = "../tests/class_hierarchy_tests.rs"]
mod tests;
