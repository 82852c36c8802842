//! Compile-time constant evaluation of annotation arguments

use crate::psi::{ClassKind, KtExpression, KtProperty};
use crate::resolve::descriptors::ConstantValue;
use crate::resolve::scope::{DeclarationIndex, LexicalScope, Resolved};
use crate::resolve::FqName;

/// Guards against `const val A = B; const val B = A`
const MAX_CONSTANT_DEPTH: usize = 32;

impl<'a> DeclarationIndex<'a> {
    /// Evaluate an expression, or `None` when it is not a constant
    pub(crate) fn evaluate(&self, expression: &KtExpression, scope: &LexicalScope) -> Option<ConstantValue> {
        self.evaluate_at(expression, scope, 0)
    }

    fn evaluate_at(
        &self,
        expression: &KtExpression,
        scope: &LexicalScope,
        depth: usize,
    ) -> Option<ConstantValue> {
        if depth > MAX_CONSTANT_DEPTH {
            return None;
        }
        match expression {
            KtExpression::StringTemplate(value) => value.clone().map(ConstantValue::String),
            KtExpression::Integer(value) => Some(ConstantValue::Int(*value)),
            KtExpression::Boolean(value) => Some(ConstantValue::Boolean(*value)),
            KtExpression::Binary { op, lhs, rhs } => {
                let lhs = self.evaluate_at(lhs, scope, depth + 1)?;
                let rhs = self.evaluate_at(rhs, scope, depth + 1)?;
                match (*op, lhs, rhs) {
                    ('+', ConstantValue::String(a), b) => Some(ConstantValue::String(format!("{}{}", a, b))),
                    ('+', ConstantValue::Int(a), ConstantValue::Int(b)) => a.checked_add(b).map(ConstantValue::Int),
                    ('-', ConstantValue::Int(a), ConstantValue::Int(b)) => a.checked_sub(b).map(ConstantValue::Int),
                    _ => None,
                }
            }
            KtExpression::Reference(path) => self.resolve_reference(path, scope, depth + 1),
            KtExpression::Other(_) => None,
        }
    }

    fn resolve_reference(&self, path: &str, scope: &LexicalScope, depth: usize) -> Option<ConstantValue> {
        match path.rsplit_once('.') {
            None => self.resolve_simple_reference(path, scope, depth),
            Some((owner, member)) => self.resolve_qualified_reference(path, owner, member, scope, depth),
        }
    }

    fn resolve_simple_reference(&self, name: &str, scope: &LexicalScope, depth: usize) -> Option<ConstantValue> {
        for owner in scope.class_chain.iter().rev() {
            if let Some(value) = self.const_in_class(owner, name, depth) {
                return Some(value);
            }
        }

        let file_scope = &self.scopes[scope.file];
        if let Some(imported) = file_scope.explicit.get(name) {
            if let Some(value) = self.top_level_const(imported, depth) {
                return Some(value);
            }
            if let Some(value) = self.const_in_class(&imported.parent(), imported.short_name(), depth) {
                return Some(value);
            }
        }

        if let Some(value) = self.top_level_const(&file_scope.package.child(name), depth) {
            return Some(value);
        }

        file_scope
            .star
            .iter()
            .find_map(|package| self.top_level_const(&package.child(name), depth))
    }

    fn resolve_qualified_reference(
        &self,
        path: &str,
        owner: &str,
        member: &str,
        scope: &LexicalScope,
        depth: usize,
    ) -> Option<ConstantValue> {
        if let Some(value) = self.top_level_const(&FqName::from(path), depth) {
            return Some(value);
        }

        let owner = match self.resolve_type(owner, scope) {
            Resolved::Unresolved => return None,
            resolved => resolved.first()?,
        };

        let Some(class_ref) = self.classes.get(&owner) else {
            // Binary classes are not read, so a member reference through one
            // is taken to be an enum entry
            return Some(ConstantValue::EnumEntry {
                enum_class: owner,
                entry: member.to_string(),
            });
        };

        if class_ref.class.kind == ClassKind::EnumClass
            && class_ref.class.enum_entries.iter().any(|e| e == member)
        {
            return Some(ConstantValue::EnumEntry {
                enum_class: owner,
                entry: member.to_string(),
            });
        }

        self.const_in_class(&owner, member, depth)
    }

    /// `const val` declared in a class/object body or in its companion
    fn const_in_class(&self, owner: &FqName, name: &str, depth: usize) -> Option<ConstantValue> {
        let class_ref = self.classes.get(owner)?;
        if let Some(property) = class_ref.class.property(name) {
            let mut chain = class_ref.outer.clone();
            chain.push(owner.clone());
            return self.const_property_value(property, class_ref.file, &chain, depth);
        }

        let companion = class_ref.class.companion()?;
        self.const_in_class(&owner.child(&companion.name), name, depth + 1)
    }

    fn top_level_const(&self, fq_name: &FqName, depth: usize) -> Option<ConstantValue> {
        let property_ref = self.top_level_properties.get(fq_name)?;
        self.const_property_value(property_ref.property, property_ref.file, &[], depth)
    }

    fn const_property_value(
        &self,
        property: &KtProperty,
        file: usize,
        class_chain: &[FqName],
        depth: usize,
    ) -> Option<ConstantValue> {
        if !property.is_const {
            return None;
        }
        let scope = LexicalScope { file, class_chain };
        self.evaluate_at(property.initializer.as_ref()?, &scope, depth + 1)
    }
}
