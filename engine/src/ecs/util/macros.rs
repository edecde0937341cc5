/// Invoke a macro once for every suffix of the given identifier list, longest first.
#[macro_export]
macro_rules! for_every_tuple {
    ($m:ident !! $head_ty:ident) => {
        $m!($head_ty);
    };
    ($m:ident !! $head_ty:ident, $($tail_ty:ident),*) => (
        $m!($head_ty, $( $tail_ty ),*);
        $crate::for_every_tuple!($m !! $( $tail_ty ),*);
    );
}

/// Apply a macro to tuples of one through twelve elements.
#[macro_export]
macro_rules! all_tuples {
    ($m:ident) => {
        $crate::for_every_tuple!($m !! A, B, C, D, E, F, G, H, I, J, K, L);
    };
}

#[cfg(test)]
mod tests {
    use std::marker::PhantomData;

    struct Arity<Params>(PhantomData<Params>);

    macro_rules! impl_arity {
         ($($name: ident),*) => {
            #[allow(dead_code)]
            impl<$($name),*> Arity<($($name,)*)> {
                pub fn len(&self) -> usize {
                    [$(stringify!($name)),*].len()
                 }
            }
        }
    }

    all_tuples!(impl_arity);

    #[test]
    fn every_arity_is_generated() {
        // Given
        let single = Arity::<(u8,)>(PhantomData);
        let twelve = Arity::<(u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8)>(PhantomData);

        // Then
        assert_eq!(single.len(), 1);
        assert_eq!(twelve.len(), 12);
    }
}
