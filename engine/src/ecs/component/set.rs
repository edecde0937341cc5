use crate::ecs::{component::Component, entity::Entity, world::World};

/// A set of components that can be attached to an entity in one go.
///
/// Implemented for every [`Component`], for `()` and for tuples of sets, so
/// `world.spawn((Transform::default(), Health(10)))` works.
pub trait Set: Send + 'static {
    /// Move every component in the set onto the entity, replacing any existing values.
    fn insert_into(self, world: &mut World, entity: Entity);
}

impl<C: Component> Set for C {
    #[inline]
    fn insert_into(self, world: &mut World, entity: Entity) {
        world.insert_component(entity, self);
    }
}

impl Set for () {
    #[inline]
    fn insert_into(self, _world: &mut World, _entity: Entity) {}
}

macro_rules! tuple_set {
    ($($name: ident),*) => {
        impl<$($name: Set),*> Set for ($($name,)*) {
            #[allow(non_snake_case)]
            fn insert_into(self, world: &mut World, entity: Entity) {
                let ($($name,)*) = self;
                $($name.insert_into(world, entity);)*
            }
        }
    }
}

crate::all_tuples!(tuple_set);
