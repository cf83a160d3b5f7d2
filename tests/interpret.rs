use stoat_smt::reports::Report;
use stoat_smt::smtlib::{Interpreter, Message, MessageSet, Position};
use stoat_smt::structures::cnf::to_cnf;
use stoat_smt::structures::symbol::boolean;

fn run(src: &str) -> (Interpreter, MessageSet) {
    let messages = MessageSet::default();
    let mut interpreter = Interpreter::new();
    interpreter.execute(Position::beginning_of("test.smt", src), &messages);
    (interpreter, messages)
}

/// Executes `src` and compares the pretty-printed CNF of the accumulated assertion.
fn check(src: &str, expected: &str) {
    let (interpreter, messages) = run(src);
    assert!(messages.is_empty(), "{messages:?}");
    let rendered = interpreter
        .symbols()
        .serialize_expr(&to_cnf(&interpreter.assertion()));
    assert_eq!(rendered, expected);
}

mod simplification {
    use super::*;

    #[test]
    fn assertions_conjoin() {
        check(
            "(declare-const A Bool)\n\
             (declare-const B Bool)\n\
             (assert A)\n\
             (assert B)\n",
            "(and A B)",
        );
    }

    #[test]
    fn integer_equality_is_an_atom() {
        check(
            "(declare-const A Int)\n\
             (declare-const B Int)\n\
             (assert (= A B))\n",
            "(= A B)",
        );
    }

    #[test]
    fn macros_substitute_eagerly() {
        check(
            "(declare-const A Bool)\n\
             (declare-const B Bool)\n\
             (define-fun F ((x Bool) (y Bool)) Bool\n\
                 (and x y))\n\
             (assert (F A B))\n",
            "(and A B)",
        );
    }

    #[test]
    fn nested_connectives_translate_by_definition() {
        check(
            "(declare-const A Bool)\n\
             (declare-const B Bool)\n\
             (declare-const C Bool)\n\
             (declare-const D Bool)\n\
             (assert (or (and A B) (and C D)))\n",
            "(and\n\
             \x20 (or (not τ0) A)\n\
             \x20 (or (not τ0) B)\n\
             \x20 (or (not τ1) C)\n\
             \x20 (or (not τ1) D)\n\
             \x20 (or (not A) (not B) τ0)\n\
             \x20 (or (not C) (not D) τ1)\n\
             \x20 (or τ0 τ1))",
        );
    }

    #[test]
    fn connectives_under_a_function_become_variables() {
        check(
            "(declare-const A Bool)\n\
             (declare-const B Bool)\n\
             (declare-const C Bool)\n\
             (declare-const D Bool)\n\
             (declare-fun F (Bool Bool) Bool)\n\
             (assert (F (and A B) (and C D)))\n",
            "(and\n\
             \x20 (F τ0 τ1)\n\
             \x20 (or (not τ0) A)\n\
             \x20 (or (not τ0) B)\n\
             \x20 (or (not τ1) C)\n\
             \x20 (or (not τ1) D)\n\
             \x20 (or (not A) (not B) τ0)\n\
             \x20 (or (not C) (not D) τ1))",
        );
    }

    #[test]
    fn shared_subexpressions_are_labeled() {
        check(
            "(declare-const A Bool)\n\
             (declare-const B Bool)\n\
             (declare-fun F (Bool) Bool)\n\
             (assert (and (F (and A B)) (F (F (and A B)))))\n",
            "(and\n\
             \x20 [1]\n\
             \x20 (F [1])\n\
             \x20 (or (not τ0) A)\n\
             \x20 (or (not τ0) B)\n\
             \x20 (or (not A) (not B) τ0))\n\
             where\n\
             \x20 [1]:\n\
             \x20   (F τ0)",
        );
    }

    #[test]
    fn let_bindings_substitute_into_the_body() {
        check(
            "(declare-const A Bool)\n\
             (declare-const B Bool)\n\
             (assert (let ((x A) (y B)) (and x y)))\n",
            "(and A B)",
        );
    }
}

mod solving {
    use super::*;

    #[test]
    fn a_satisfiable_script() {
        let (interpreter, messages) = run(
            "(declare-const A Bool)\n\
             (declare-const B Bool)\n\
             (assert (or A B))\n\
             (assert (not A))\n\
             (check-sat)\n",
        );
        assert!(messages.is_empty(), "{messages:?}");

        let model = interpreter.model().expect("a model was built");
        assert_eq!(model.report(), Some(Report::Satisfiable));

        let memory = interpreter.memory();
        let a = interpreter
            .symbols()
            .get_symbol(memory, "A", &[])
            .expect("A is declared");
        let b = interpreter
            .symbols()
            .get_symbol(memory, "B", &[])
            .expect("B is declared");
        assert_eq!(model.eval(&a.apply(&[])), Some(boolean(false)));
        assert_eq!(model.eval(&b.apply(&[])), Some(boolean(true)));
    }

    #[test]
    fn complementary_assertions_are_unsatisfiable() {
        let (interpreter, messages) = run(
            "(declare-const A Bool)\n\
             (assert A)\n\
             (assert (not A))\n\
             (check-sat)\n",
        );
        assert!(messages.is_empty(), "{messages:?}");
        let model = interpreter.model().expect("a model was built");
        assert_eq!(model.report(), Some(Report::Unsatisfiable));
    }

    #[test]
    fn an_unsatisfiable_chain() {
        let (interpreter, messages) = run(
            "(declare-const x1 Bool)\n\
             (declare-const x2 Bool)\n\
             (declare-const x3 Bool)\n\
             (declare-const x4 Bool)\n\
             (assert (or (not x1) x2))\n\
             (assert (or (not x2) x3))\n\
             (assert (or (not x4) x1))\n\
             (assert (or (not x4) (not x3)))\n\
             (assert x4)\n\
             (check-sat)\n",
        );
        assert!(messages.is_empty(), "{messages:?}");
        let model = interpreter.model().expect("a model was built");
        assert_eq!(model.report(), Some(Report::Unsatisfiable));
    }

    #[test]
    fn an_empty_assertion_set_is_satisfiable() {
        let (interpreter, messages) = run("(check-sat)\n");
        assert!(messages.is_empty(), "{messages:?}");
        let model = interpreter.model().expect("a model was built");
        assert_eq!(model.report(), Some(Report::Satisfiable));
    }

    #[test]
    fn models_satisfy_every_clause() {
        let (interpreter, messages) = run(
            "(declare-const A Bool)\n\
             (declare-const B Bool)\n\
             (declare-const C Bool)\n\
             (assert (or (and A B) (and (not A) C)))\n\
             (check-sat)\n",
        );
        assert!(messages.is_empty(), "{messages:?}");

        let model = interpreter.model().expect("a model was built");
        assert_eq!(model.report(), Some(Report::Satisfiable));
        let memory = model.memory();
        for clause in model.clauses() {
            assert!(clause
                .literals()
                .iter()
                .any(|literal| model.assignment().value(memory, &literal.negated()) == Some(true)));
        }
    }
}

mod diagnostics {
    use super::*;

    fn descriptions(messages: &MessageSet) -> Vec<String> {
        messages
            .iter()
            .into_iter()
            .map(|m| m.description().to_string())
            .collect()
    }

    #[test]
    fn an_undeclared_symbol_is_reported_once() {
        let (_, messages) = run(
            "(assert mystery)\n\
             (assert mystery)\n",
        );
        assert_eq!(
            descriptions(&messages),
            vec!["symbol 'mystery' not declared".to_string()]
        );
    }

    #[test]
    fn redeclarations_are_reported() {
        let (_, messages) = run(
            "(declare-const A Bool)\n\
             (declare-const A Int)\n\
             (declare-const and Bool)\n",
        );
        assert_eq!(
            descriptions(&messages),
            vec![
                "invalid declaration, symbol 'A' already declared".to_string(),
                "invalid declaration, builtin symbol 'and'".to_string(),
            ]
        );
    }

    #[test]
    fn sort_mismatches_are_reported_per_argument() {
        let (_, messages) = run(
            "(declare-const A Bool)\n\
             (declare-const N Int)\n\
             (declare-fun F (Bool Int) Bool)\n\
             (assert (F N A))\n",
        );
        assert_eq!(
            descriptions(&messages),
            vec![
                "sort mismatch at argument #1 for function 'F'".to_string(),
                "sort mismatch at argument #2 for function 'F'".to_string(),
            ]
        );
    }

    #[test]
    fn arity_problems_are_reported() {
        let (_, messages) = run(
            "(declare-const A Bool)\n\
             (declare-fun F (Bool Bool) Bool)\n\
             (assert (F A))\n\
             (assert (F A A A))\n",
        );
        assert_eq!(
            descriptions(&messages),
            vec![
                "not enough arguments (1) passed to function 'F'".to_string(),
                "extra argument passed to function 'F'".to_string(),
            ]
        );
    }

    #[test]
    fn a_non_boolean_assertion_is_reported() {
        let (_, messages) = run(
            "(declare-const N Int)\n\
             (assert N)\n",
        );
        assert_eq!(
            descriptions(&messages),
            vec!["invalid assert command, term is not Bool".to_string()]
        );
    }

    #[test]
    fn a_tainted_assertion_is_skipped() {
        let (interpreter, messages) = run(
            "(declare-const A Bool)\n\
             (assert (and A mystery))\n",
        );
        assert_eq!(
            descriptions(&messages),
            vec!["symbol 'mystery' not declared".to_string()]
        );
        assert_eq!(interpreter.assertion(), boolean(true));
    }

    #[test]
    fn get_model_without_a_solve_is_reported() {
        let (_, messages) = run("(get-model)\n");
        assert_eq!(
            descriptions(&messages),
            vec!["model not available".to_string()]
        );
    }

    #[test]
    fn messages_carry_line_and_column() {
        let (_, messages) = run("(assert mystery)");
        let rendered: Vec<String> = messages.iter().iter().map(Message::to_string).collect();
        assert_eq!(rendered, vec!["(1, 9): symbol 'mystery' not declared".to_string()]);
    }
}
