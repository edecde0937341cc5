use crate::ecs::schedule::task::{Id, Kind, Label};

/// How a task relates to a target label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Run before the target task, or before everything inside the target slot.
    Before,
    /// Run after the target task, or after everything inside the target slot.
    After,
    /// Run inside the target slot, between its before and after tasks.
    Within,
    /// Be the work the target slot stands for. Orders like `Within`.
    Fulfills,
}

/// The label a constraint points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub id: Id,
    pub name: &'static str,
    pub kind: Kind,
}

impl Target {
    fn of<L: Label>() -> Self {
        Self {
            id: Id::of::<L>(),
            name: L::name(),
            kind: L::KIND,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraint {
    pub relation: Relation,
    pub target: Target,
}

/// The ordering constraints one task declares. Built once per task while a schedule is
/// constructed and discarded afterwards.
///
/// ```rust,ignore
/// fn define_contract(contract: &mut Contract) {
///     contract
///         .execute_after(ReceiveInput)
///         .execute_before(ProcessPhysics);
/// }
/// ```
#[derive(Debug, Default, Clone)]
pub struct Contract {
    constraints: Vec<Constraint>,
}

impl Contract {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn execute_before<L: Label>(&mut self, _label: L) -> &mut Self {
        self.push(Relation::Before, Target::of::<L>())
    }

    pub fn execute_after<L: Label>(&mut self, _label: L) -> &mut Self {
        self.push(Relation::After, Target::of::<L>())
    }

    pub fn executes_within<L: Label>(&mut self, _label: L) -> &mut Self {
        self.push(Relation::Within, Target::of::<L>())
    }

    pub fn fulfills<L: Label>(&mut self, _label: L) -> &mut Self {
        self.push(Relation::Fulfills, Target::of::<L>())
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    fn push(&mut self, relation: Relation, target: Target) -> &mut Self {
        self.constraints.push(Constraint { relation, target });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{define_slot, define_task};

    define_task!(Spawn);
    define_slot!(Simulate);

    #[test]
    fn records_constraints_in_order() {
        // Given
        let mut contract = Contract::new();

        // When
        contract.execute_after(Spawn).fulfills(Simulate);

        // Then
        let constraints = contract.constraints();
        assert_eq!(constraints.len(), 2);
        assert_eq!(constraints[0].relation, Relation::After);
        assert_eq!(constraints[0].target.kind, Kind::Task);
        assert_eq!(constraints[0].target.name, "Spawn");
        assert_eq!(constraints[1].relation, Relation::Fulfills);
        assert_eq!(constraints[1].target.kind, Kind::Slot);
        assert_eq!(constraints[1].target.id, Simulate.id());
    }
}
