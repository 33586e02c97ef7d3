// Strongly-typed model shared by the classifier, the plan builder and the driver.
// Descriptors come in from discovery; plans go out to emission. Nothing here is mutated after construction.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ————————————————————————————————————————————————————————————————————————————
// TYPE SHAPES
// ————————————————————————————————————————————————————————————————————————————

/// Abstract view of a declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub name: String,
    #[serde(default)]
    pub is_value_type: bool,     // reference type otherwise
    #[serde(default)]
    pub nullable: bool,          // `T?`-style annotation
    #[serde(default)]
    pub deep_cloneable: bool,
    #[serde(default)]
    pub shallow_cloneable: bool,
    #[serde(default)]
    pub record_like: bool,
    #[serde(flatten)]
    pub kind: TypeKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeKind {
    Scalar,
    String,
    Array {
        rank: u32,
        element: Box<TypeDescriptor>,
    },
    Dictionary {
        variant: DictionaryVariant,
        #[serde(default)]
        key: Option<Box<TypeDescriptor>>,   // None: discovered without type arguments
        #[serde(default)]
        value: Option<Box<TypeDescriptor>>,
    },
    Collection {
        variant: CollectionVariant,
        #[serde(default)]
        element: Option<Box<TypeDescriptor>>,
    },
    UserCloneable,
    Opaque,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionVariant {
    List,
    Stack,
    Queue,
    HashSet,
    SortedSet,
    ObservableCollection,
    ReadOnlyCollection,
    ImmutableList,
    ImmutableArray,
    ImmutableHashSet,
    ImmutableQueue,
    ImmutableStack,
    Other,                       // any other sequence; rebuilt as a list
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DictionaryVariant {
    Dictionary,
    ImmutableDictionary,
    ReadOnlyDictionary,
    Other,                       // any other keyed container; rebuilt as a plain dictionary
}

impl TypeDescriptor {
    fn with_kind(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            is_value_type: false,
            nullable: false,
            deep_cloneable: false,
            shallow_cloneable: false,
            record_like: false,
            kind,
        }
    }

    /// A value-type primitive such as `int` or `bool`.
    pub fn scalar(name: impl Into<String>) -> Self {
        Self { is_value_type: true, ..Self::with_kind(name, TypeKind::Scalar) }
    }

    pub fn string() -> Self {
        Self::with_kind("string", TypeKind::String)
    }

    /// A reference type that opts into deep cloning.
    pub fn cloneable(name: impl Into<String>) -> Self {
        Self {
            deep_cloneable: true,
            shallow_cloneable: true,
            ..Self::with_kind(name, TypeKind::UserCloneable)
        }
    }

    pub fn opaque(name: impl Into<String>) -> Self {
        Self::with_kind(name, TypeKind::Opaque)
    }

    pub fn array(element: TypeDescriptor, rank: u32) -> Self {
        let commas = ",".repeat(rank.saturating_sub(1) as usize);
        let name = format!("{}[{commas}]", element.name);
        Self::with_kind(name, TypeKind::Array { rank, element: Box::new(element) })
    }

    pub fn collection(variant: CollectionVariant, element: TypeDescriptor) -> Self {
        let name = format!("{variant:?}<{}>", element.name);
        Self::with_kind(name, TypeKind::Collection { variant, element: Some(Box::new(element)) })
    }

    pub fn list(element: TypeDescriptor) -> Self {
        Self::collection(CollectionVariant::List, element)
    }

    pub fn dictionary(variant: DictionaryVariant, key: TypeDescriptor, value: TypeDescriptor) -> Self {
        let name = format!("{variant:?}<{}, {}>", key.name, value.name);
        Self::with_kind(name, TypeKind::Dictionary {
            variant,
            key: Some(Box::new(key)),
            value: Some(Box::new(value)),
        })
    }

    /// A container type with no resolved type arguments.
    pub fn bare_collection(name: impl Into<String>, variant: CollectionVariant) -> Self {
        Self::with_kind(name, TypeKind::Collection { variant, element: None })
    }

    pub fn bare_dictionary(name: impl Into<String>, variant: DictionaryVariant) -> Self {
        Self::with_kind(name, TypeKind::Dictionary { variant, key: None, value: None })
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn value_type(mut self) -> Self {
        self.is_value_type = true;
        self
    }

    pub fn deep_cloneable(mut self) -> Self {
        self.deep_cloneable = true;
        self
    }

    pub fn is_reference_type(&self) -> bool {
        !self.is_value_type
    }

    /// Exposes a deep-clone capability, so cloning can delegate to it.
    pub fn is_user_cloneable(&self) -> bool {
        self.deep_cloneable || matches!(self.kind, TypeKind::UserCloneable)
    }

    /// Whether a member of this type may hold no value at all.
    pub fn can_be_absent(&self) -> bool {
        self.nullable || self.is_reference_type()
    }
}

impl CollectionVariant {
    /// LIFO containers enumerate in pop order.
    pub fn enumerates_in_reverse(self) -> bool {
        matches!(self, Self::Stack | Self::ImmutableStack)
    }

    /// Order in which a rebuilt container must receive `enumerated` so that
    /// it enumerates exactly like the original.
    pub fn insertion_order<T>(self, enumerated: Vec<T>) -> Vec<T> {
        let mut items = enumerated;
        if self.enumerates_in_reverse() {
            items.reverse();
        }
        items
    }
}

// ————————————————————————————————————————————————————————————————————————————
// MEMBERS & DECLARATIONS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    #[serde(default)]
    pub mutability: Mutability,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default = "default_readable")]
    pub readable: bool,          // has a getter the clone can read from
    #[serde(default)]
    pub is_static: bool,
}

fn default_readable() -> bool { true }

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutability {
    #[default]
    Mutable,
    InitOnly,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    PublicWritable,
    PublicInit,
    NotExposed,
}

impl MemberDescriptor {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
            mutability: Mutability::Mutable,
            visibility: Visibility::PublicWritable,
            readable: true,
            is_static: false,
        }
    }

    /// Init-only member exposed through a public `init` accessor.
    pub fn init_only(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            mutability: Mutability::InitOnly,
            visibility: Visibility::PublicInit,
            ..Self::new(name, ty)
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visibility = Visibility::NotExposed;
        self
    }

    pub fn is_init_only(&self) -> bool {
        self.mutability == Mutability::InitOnly
    }

    pub fn is_eligible(&self) -> bool {
        matches!(self.visibility, Visibility::PublicWritable | Visibility::PublicInit)
            && self.readable
            && !self.is_static
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    #[serde(default)]
    pub deep: bool,
    #[serde(default)]
    pub shallow: bool,
}

impl Capabilities {
    pub const NONE: Self = Self { deep: false, shallow: false };
    pub const BOTH: Self = Self { deep: true, shallow: true };

    pub fn has(self, capability: Capability) -> bool {
        match capability {
            Capability::Deep => self.deep,
            Capability::Shallow => self.shallow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Deep,
    Shallow,
}

/// The containing type a plan is built for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDeclaration {
    pub name: String,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub record_like: bool,
    #[serde(default)]
    pub capabilities: Capabilities,      // marker capabilities opted into
    #[serde(default)]
    pub user_implemented: Capabilities,  // clone methods already hand-written
    #[serde(default)]
    pub members: Vec<MemberDescriptor>,
    #[serde(default)]
    pub ancestors: Vec<AncestorDeclaration>, // most-derived first
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AncestorDeclaration {
    pub name: String,
    #[serde(default)]
    pub members: Vec<MemberDescriptor>,
}

impl TypeDeclaration {
    /// A concrete class opting into both capabilities.
    pub fn class(name: impl Into<String>, members: Vec<MemberDescriptor>) -> Self {
        Self {
            name: name.into(),
            is_abstract: false,
            record_like: false,
            capabilities: Capabilities::BOTH,
            user_implemented: Capabilities::NONE,
            members,
            ancestors: Vec::new(),
        }
    }

    pub fn record(name: impl Into<String>, members: Vec<MemberDescriptor>) -> Self {
        Self { record_like: true, ..Self::class(name, members) }
    }

    pub fn with_ancestor(mut self, name: impl Into<String>, members: Vec<MemberDescriptor>) -> Self {
        self.ancestors.push(AncestorDeclaration { name: name.into(), members });
        self
    }
}

// ————————————————————————————————————————————————————————————————————————————
// PLANS
// ————————————————————————————————————————————————————————————————————————————

/// Whether a container element is delegated to its own clone or copied as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementAction {
    Copy,
    Clone,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CloneAction {
    CopyScalar,
    RecurseCloneable,
    CloneArray { rank: u32, element: ElementAction },
    CloneDictionary { variant: DictionaryVariant, value: ElementAction },
    CloneCollection { variant: CollectionVariant, element: ElementAction },
    CopyReference,
}

impl CloneAction {
    /// Plain assignment, no transform.
    pub fn is_direct_assignment(&self) -> bool {
        matches!(self, Self::CopyScalar | Self::CopyReference)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructionStrategy {
    ObjectInitializer,
    FunctionalUpdate,
    StatementSequence,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub action: CloneAction,
    pub null_guarded: bool,      // absent in => absent out
    pub init_only: bool,
    pub declared_in: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClonePlan {
    pub type_name: String,
    pub capability: Capability,
    pub strategy: ConstructionStrategy,
    pub members: IndexMap<String, PlanEntry>, // declaration order, most-derived first
}

impl ClonePlan {
    pub fn action(&self, member: &str) -> Option<&CloneAction> {
        self.members.get(member).map(|entry| &entry.action)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
