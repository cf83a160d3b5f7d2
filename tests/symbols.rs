use stoat_smt::structures::expr::Expr;
use stoat_smt::structures::sort::Sort;
use stoat_smt::structures::symbol::{
    boolean, boolean_and, boolean_eq, boolean_implies, boolean_or, integer, integer_eq,
    integer_sum, Symbol,
};

fn bool_var() -> Expr {
    Symbol::variable(Sort::Bool).apply(&[])
}

fn int_var() -> Expr {
    Symbol::variable(Sort::Int).apply(&[])
}

mod boolean_identities {
    use super::*;

    #[test]
    fn commutativity_and_associativity() {
        let (a, b, c) = (bool_var(), bool_var(), bool_var());
        assert_eq!(boolean_or(&[a.clone(), b.clone()]), boolean_or(&[b.clone(), a.clone()]));
        assert_eq!(
            boolean_or(&[boolean_or(&[a.clone(), b.clone()]), c.clone()]),
            boolean_or(&[a.clone(), boolean_or(&[b.clone(), c.clone()])])
        );
        assert_eq!(
            boolean_and(&[boolean_and(&[a.clone(), b.clone()]), c.clone()]),
            boolean_and(&[a.clone(), boolean_and(&[b, c])])
        );
    }

    #[test]
    fn de_morgan() {
        let (a, b) = (bool_var(), bool_var());
        assert_eq!(
            boolean_or(&[a.clone(), b.clone()]).negated(),
            boolean_and(&[a.negated(), b.negated()])
        );
        assert_eq!(
            boolean_and(&[a.clone(), b.clone()]).negated(),
            boolean_or(&[a.negated(), b.negated()])
        );
    }

    #[test]
    fn idempotence_and_complements() {
        let a = bool_var();
        assert_eq!(boolean_or(&[a.clone(), a.clone()]), a);
        assert_eq!(boolean_and(&[a.clone(), a.clone()]), a);
        assert_eq!(boolean_or(&[a.clone(), a.negated()]), boolean(true));
        assert_eq!(boolean_and(&[a.clone(), a.negated()]), boolean(false));
    }

    #[test]
    fn constants_absorb_and_dominate() {
        let a = bool_var();
        assert_eq!(boolean_or(&[a.clone(), boolean(true)]), boolean(true));
        assert_eq!(boolean_or(&[a.clone(), boolean(false)]), a);
        assert_eq!(boolean_and(&[a.clone(), boolean(true)]), a);
        assert_eq!(boolean_and(&[a, boolean(false)]), boolean(false));
    }

    #[test]
    fn absorption() {
        let (a, b) = (bool_var(), bool_var());
        assert_eq!(boolean_or(&[a.clone(), boolean_and(&[a.clone(), b.clone()])]), a);
        assert_eq!(boolean_and(&[a.clone(), boolean_or(&[a.clone(), b])]), a.clone());
    }

    #[test]
    fn consensus_cancellation() {
        let (a, b) = (bool_var(), bool_var());
        assert_eq!(
            boolean_or(&[
                boolean_and(&[a.clone(), b.clone()]),
                boolean_and(&[a.negated(), b.clone()])
            ]),
            b
        );
        assert_eq!(
            boolean_and(&[
                boolean_or(&[a.clone(), b.clone()]),
                boolean_or(&[a.negated(), b.clone()])
            ]),
            b
        );
        assert_eq!(
            boolean_or(&[boolean_and(&[a.clone(), b.clone()]), a.negated()]),
            boolean_or(&[a.negated(), b.clone()])
        );
        assert_eq!(
            boolean_and(&[boolean_or(&[a.clone(), b.clone()]), a.negated()]),
            boolean_and(&[a.negated(), b])
        );
    }

    #[test]
    fn contraposition() {
        let (a, b) = (bool_var(), bool_var());
        assert_eq!(
            boolean_implies(&a, &b),
            boolean_implies(&b.negated(), &a.negated())
        );
    }

    #[test]
    fn double_negation() {
        let a = bool_var();
        assert_eq!(a.negated().negated(), a);
    }

    #[test]
    fn equality_is_mutual_implication() {
        let (a, b) = (bool_var(), bool_var());
        assert_eq!(
            boolean_eq(&[a.clone(), b.clone()]),
            boolean_and(&[boolean_implies(&a, &b), boolean_implies(&b, &a)])
        );
    }
}

mod equalities {
    use super::*;

    #[test]
    fn boolean_equality_deduplicates() {
        let (a, b) = (bool_var(), bool_var());
        assert_eq!(
            boolean_eq(&[a.clone(), a.clone(), a.clone(), a.clone()]),
            boolean(true)
        );
        assert_eq!(
            boolean_eq(&[b.clone(), a.clone(), a.clone()]),
            boolean_eq(&[a, b])
        );
    }

    #[test]
    fn boolean_equality_chains_pairwise() {
        let (a, b, c) = (bool_var(), bool_var(), bool_var());
        assert_eq!(
            boolean_eq(&[a.clone(), b.clone(), c.clone()]),
            boolean_and(&[boolean_eq(&[a, b.clone()]), boolean_eq(&[b, c])])
        );
    }

    #[test]
    fn integer_equality_normalizes() {
        let (a, b, c) = (int_var(), int_var(), int_var());
        assert_eq!(
            integer_eq(&[a.clone(), a.clone(), a.clone(), a.clone()]),
            boolean(true)
        );
        assert_eq!(
            integer_eq(&[a.clone(), b.clone(), c.clone()]),
            integer_eq(&[a.clone(), b.clone(), c.clone()])
        );
        assert_eq!(
            integer_eq(&[b.clone(), a.clone(), a.clone(), c.clone(), c.clone()]),
            integer_eq(&[a, b, c])
        );
    }

    #[test]
    fn integer_equality_cancels_common_summands() {
        let (a, b, c) = (int_var(), int_var(), int_var());
        assert_eq!(
            integer_eq(&[
                integer_sum(&[a.clone(), c.clone()]),
                integer_sum(&[b.clone(), c.clone()])
            ]),
            integer_eq(&[a, b])
        );
    }
}

mod sums {
    use super::*;

    #[test]
    fn a_nested_sum_folds_to_its_total() {
        let e = integer_sum(&[
            integer_sum(&[
                integer_sum(&[
                    integer_sum(&[
                        integer_sum(&[integer(1), integer(2)]),
                        integer_sum(&[integer(3), integer(4), integer(5)]),
                    ]),
                    integer_sum(&[integer(6), integer(7)]),
                ]),
                integer_sum(&[integer(8), integer(9), integer(10)]),
            ]),
            integer_sum(&[
                integer_sum(&[integer(11), integer(12)]),
                integer_sum(&[integer(13), integer(14)]),
                integer_sum(&[integer(15), integer(16)]),
            ]),
            integer_sum(&[
                integer_sum(&[integer(17), integer(18)]),
                integer_sum(&[integer(19), integer(20)]),
            ]),
        ]);
        assert_eq!(e.negated(), integer(-210));
    }

    #[test]
    fn a_homogeneous_sum_folds() {
        let a = integer(10);
        assert_eq!(
            integer_sum(&[
                a.clone(),
                a.clone(),
                integer_sum(&[a.clone(), integer_sum(&[a.clone(), a.clone()]), a.clone()])
            ]),
            integer(60)
        );
    }

    #[test]
    fn opposite_summands_cancel() {
        let a = int_var();
        assert_eq!(integer_sum(&[a.clone(), a.negated()]), integer(0));
        assert_eq!(integer_sum(&[a.clone(), a.negated(), integer(7)]), integer(7));
    }
}
