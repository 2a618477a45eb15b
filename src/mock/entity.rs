// src/mock/entity.rs
//! Resolved protocol entities
//!
//! A [`ResolvedEntity`] is what the source extractor hands over: the protocol
//! declaration ([`EntityModel`]) plus the members it inherits from parent
//! protocols, already looked up.

use serde::{Deserialize, Serialize};

/// A method parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Param {
    /// Argument label at the call site
    pub label: String,

    pub type_name: String,
}

impl Param {
    pub fn new(label: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            type_name: type_name.into(),
        }
    }
}

/// A protocol requirement
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Member {
    Variable {
        name: String,
        type_name: String,
        is_static: bool,
    },
    Method {
        name: String,
        params: Vec<Param>,
        /// `None` for `Void`
        return_type: Option<String>,
        is_static: bool,
    },
}

impl Member {
    pub fn variable(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Member::Variable {
            name: name.into(),
            type_name: type_name.into(),
            is_static: false,
        }
    }

    pub fn method(
        name: impl Into<String>,
        params: Vec<Param>,
        return_type: Option<&str>,
    ) -> Self {
        Member::Method {
            name: name.into(),
            params,
            return_type: return_type.map(str::to_string),
            is_static: false,
        }
    }

    /// Mark the member as `static`
    pub fn into_static(mut self) -> Self {
        match &mut self {
            Member::Variable { is_static, .. } | Member::Method { is_static, .. } => {
                *is_static = true
            }
        }
        self
    }

    pub fn name(&self) -> &str {
        match self {
            Member::Variable { name, .. } | Member::Method { name, .. } => name,
        }
    }

    pub fn is_static(&self) -> bool {
        match self {
            Member::Variable { is_static, .. } | Member::Method { is_static, .. } => *is_static,
        }
    }

    /// Identity used to drop requirements redeclared by a parent protocol
    pub fn signature(&self) -> String {
        match self {
            Member::Variable { name, .. } => name.clone(),
            Member::Method { name, params, .. } => {
                let labels: Vec<&str> = params.iter().map(|p| p.label.as_str()).collect();
                format!("{}({})", name, labels.join(":"))
            }
        }
    }
}

/// A protocol declaration selected for mocking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityModel {
    /// Declared protocol name
    pub name: String,

    /// Byte offset of the declaration in its source file
    pub offset: i64,

    /// Requirements declared directly on the protocol
    pub members: Vec<Member>,
}

impl EntityModel {
    pub fn new(name: impl Into<String>, offset: i64) -> Self {
        Self {
            name: name.into(),
            offset,
            members: Vec::new(),
        }
    }

    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }
}

/// A protocol plus everything it inherits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedEntity {
    /// Name the generated mock conforms to
    pub key: String,

    pub model: EntityModel,

    /// Requirements inherited from parent protocols
    pub inherited: Vec<Member>,
}

impl ResolvedEntity {
    pub fn new(model: EntityModel) -> Self {
        Self {
            key: model.name.clone(),
            model,
            inherited: Vec::new(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_inherited(mut self, members: Vec<Member>) -> Self {
        self.inherited = members;
        self
    }

    /// Own members first, then inherited ones not already declared
    pub fn all_members(&self) -> Vec<&Member> {
        let mut seen = std::collections::HashSet::new();
        self.model
            .members
            .iter()
            .chain(self.inherited.iter())
            .filter(|member| seen.insert(member.signature()))
            .collect()
    }
}
