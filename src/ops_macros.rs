//
// ops_macros.rs
// Copyright (C) 2019 Malcolm Ramsay <malramsay64@gmail.com>
// Distributed under terms of the MIT license.
//

#![macro_use]

/// Implement a single multiplication impl block
///
/// The lifetimes are passed through so the same arm covers owned and borrowed operands.
///
macro_rules! _mul_impl(
    ($lhs: ident: $Lhs: ty, $rhs: ident: $Rhs: ty, Output = $Output: ty;
     $action: expr; $($lives: tt),*) => {
        impl<$($lives ,)*> Mul<$Rhs> for $Lhs {
            type Output = $Output;

            #[inline]
            fn mul($lhs, $rhs: $Rhs) -> Self::Output {
                $action
            }
        }
    }
);

/// Implement multiplication for every combination of values and references
///
/// Only the `&lhs * &rhs` form is written out, every other combination borrows its operands
/// and forwards to it. Rotations are composed and applied to vectors in a lot of places while
/// building the orientation tables, and this keeps the call sites free of explicit borrows.
///
macro_rules! mul_impl_all(
    ($lhs: ident: $Lhs: ty, $rhs: ident: $Rhs: ty, Output = $Output: ty;
     [ref ref] => $action_ref_ref: expr;) => {
        _mul_impl!(
            $lhs: $Lhs, $rhs: $Rhs, Output = $Output;
            &$lhs * &$rhs; );

        _mul_impl!(
            $lhs: &'a $Lhs, $rhs: $Rhs, Output = $Output;
            $lhs * &$rhs; 'a);

        _mul_impl!(
            $lhs: $Lhs, $rhs: &'b $Rhs, Output = $Output;
            &$lhs * $rhs; 'b);

        _mul_impl!(
            $lhs: &'a $Lhs, $rhs: &'b $Rhs, Output = $Output;
            $action_ref_ref; 'a, 'b);
    }
);
